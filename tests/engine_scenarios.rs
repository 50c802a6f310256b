use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

use filesense_applier::ops::{self, SkipReason};
use filesense_applier::script::{render_changelog, render_revert};
use filesense_applier::{
    ChangeRecord, Decision, Engine, FsMover, OutcomeStatus, PromptDecider, ScriptedDecider, Shell,
};

fn rec(src: &Path, dst: &Path) -> ChangeRecord {
    ChangeRecord::new(src, dst)
}

/// Relative paths of every entry under `root`, sorted.
fn snapshot(root: &Path) -> Vec<PathBuf> {
    fn walk(root: &Path, dir: &Path, acc: &mut Vec<PathBuf>) {
        for entry in fs::read_dir(dir).unwrap() {
            let p = entry.unwrap().path();
            acc.push(p.strip_prefix(root).unwrap().to_path_buf());
            if p.is_dir() {
                walk(root, &p, acc);
            }
        }
    }
    let mut acc = Vec::new();
    walk(root, root, &mut acc);
    acc.sort();
    acc
}

#[test]
fn nested_rename_orders_child_first_and_reverts() {
    let td = tempdir().unwrap();
    let root = td.path();
    let a = root.join("a");
    fs::create_dir_all(&a).unwrap();
    fs::write(a.join("b.txt"), "payload").unwrap();
    let before = snapshot(root);

    let ops = ops::prepare(vec![
        rec(&a.join("b.txt"), &a.join("c.txt")),
        rec(&a, &root.join("z")),
    ]);
    assert_eq!(ops[0].source(), a.join("b.txt"));
    assert_eq!(ops[1].source(), a);

    let mut engine = Engine::new(FsMover, ScriptedDecider::default());
    let report = engine.apply(ops);
    assert!(report.halt.is_none());
    assert_eq!(report.applied_count(), 2);
    assert_eq!(
        fs::read_to_string(root.join("z").join("c.txt")).unwrap(),
        "payload"
    );
    assert_eq!(engine.decider().asked(), 0);

    let applied: Vec<_> = report.applied().collect();
    let forward = render_changelog(Shell::Posix, &applied);
    let lines: Vec<&str> = forward.lines().collect();
    assert_eq!(lines[0], "#!/bin/bash");
    assert_eq!(
        lines[1],
        format!("mv -- '{}' '{}'", a.join("b.txt").display(), a.join("c.txt").display())
    );
    assert_eq!(
        lines[2],
        format!("mv -- '{}' '{}'", a.display(), root.join("z").display())
    );

    let revert = render_revert(Shell::Posix, &applied);
    let lines: Vec<&str> = revert.lines().collect();
    assert_eq!(
        lines[1],
        format!("mv -- '{}' '{}'", root.join("z").display(), a.display())
    );
    assert_eq!(
        lines[2],
        format!("mv -- '{}' '{}'", a.join("c.txt").display(), a.join("b.txt").display())
    );

    // Undo the applied outcomes in reverse and compare with the original tree.
    for o in report.applied().rev() {
        fs::rename(&o.destination, o.source()).unwrap();
    }
    assert_eq!(snapshot(root), before);
}

#[test]
fn conflict_rename_is_reflected_in_revert() {
    let td = tempdir().unwrap();
    let root = td.path();
    fs::write(root.join("in.txt"), "new").unwrap();
    fs::write(root.join("out.txt"), "old").unwrap();

    let input = Cursor::new("R\nout2.txt\n");
    let mut engine = Engine::new(FsMover, PromptDecider::new(input, Vec::new()));
    let report = engine.apply(ops::prepare(vec![rec(&root.join("in.txt"), &root.join("out.txt"))]));

    let o = &report.outcomes[0];
    assert_eq!(o.status, OutcomeStatus::Renamed);
    assert_eq!(o.destination, root.join("out2.txt"));
    assert_eq!(o.requested(), root.join("out.txt"));
    assert_eq!(fs::read_to_string(root.join("out.txt")).unwrap(), "old");
    assert_eq!(fs::read_to_string(root.join("out2.txt")).unwrap(), "new");

    let applied: Vec<_> = report.applied().collect();
    let revert = render_revert(Shell::Posix, &applied);
    assert!(revert.contains(&format!(
        "mv -- '{}' '{}'",
        root.join("out2.txt").display(),
        root.join("in.txt").display()
    )));
    assert!(!revert.contains(&format!("'{}'", root.join("out.txt").display())));
}

#[test]
fn empty_answer_skips_conflict_and_omits_it_from_scripts() {
    let td = tempdir().unwrap();
    let root = td.path();
    fs::write(root.join("a.txt"), "a").unwrap();
    fs::write(root.join("taken.txt"), "t").unwrap();
    fs::write(root.join("free_src.txt"), "f").unwrap();

    let mut engine = Engine::new(FsMover, PromptDecider::new(Cursor::new("\n"), Vec::new()));
    let report = engine.apply(ops::prepare(vec![
        rec(&root.join("a.txt"), &root.join("taken.txt")),
        rec(&root.join("free_src.txt"), &root.join("free_dst.txt")),
    ]));

    let skipped = report
        .outcomes
        .iter()
        .find(|o| o.source() == root.join("a.txt"))
        .unwrap();
    assert_eq!(skipped.status, OutcomeStatus::Skipped(SkipReason::Conflict));
    assert!(root.join("a.txt").exists());
    assert_eq!(report.applied_count(), 1);

    let applied: Vec<_> = report.applied().collect();
    for script in [
        render_changelog(Shell::Posix, &applied),
        render_revert(Shell::Posix, &applied),
    ] {
        assert!(!script.contains("a.txt'"), "skipped op leaked into: {script}");
        assert_eq!(script.lines().count(), 2);
    }
}

#[test]
fn repeated_conflicting_renames_reprompt_without_duplicates() {
    let td = tempdir().unwrap();
    let root = td.path();
    fs::write(root.join("src.txt"), "s").unwrap();
    fs::write(root.join("dst.txt"), "d").unwrap();
    fs::write(root.join("also.txt"), "x").unwrap();

    let answers = "R\ndst.txt\nr\nalso.txt\nR\nfinal.txt\n";
    let mut engine = Engine::new(FsMover, PromptDecider::new(Cursor::new(answers), Vec::new()));
    let report = engine.apply(ops::prepare(vec![rec(&root.join("src.txt"), &root.join("dst.txt"))]));

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].destination, root.join("final.txt"));
    assert_eq!(fs::read_to_string(root.join("final.txt")).unwrap(), "s");
    assert_eq!(fs::read_to_string(root.join("dst.txt")).unwrap(), "d");
    assert_eq!(fs::read_to_string(root.join("also.txt")).unwrap(), "x");

    let shown = String::from_utf8(engine.into_decider().into_output()).unwrap();
    assert_eq!(shown.matches("Enter new name").count(), 3);
}

#[test]
fn missing_source_can_be_retried_then_skipped() {
    let td = tempdir().unwrap();
    let root = td.path();
    let decider = ScriptedDecider::new([Decision::Retry, Decision::Skip]);
    let mut engine = Engine::new(FsMover, decider);
    let report = engine.apply(ops::prepare(vec![rec(&root.join("gone"), &root.join("there"))]));

    match &report.outcomes[0].status {
        OutcomeStatus::Skipped(SkipReason::Failed(msg)) => assert!(msg.contains("not found")),
        other => panic!("expected failure skip, got {other:?}"),
    }
    assert_eq!(engine.decider().asked(), 2);
    assert!(report.halt.is_none());
}

#[test]
fn closed_prompt_halts_but_keeps_applied_outcomes() {
    let td = tempdir().unwrap();
    let root = td.path();
    fs::write(root.join("first_longer_name.txt"), "1").unwrap();
    fs::write(root.join("b.txt"), "2").unwrap();
    fs::write(root.join("busy.txt"), "3").unwrap();

    let mut engine = Engine::new(FsMover, PromptDecider::new(Cursor::new(""), Vec::new()));
    let report = engine.apply(ops::prepare(vec![
        rec(&root.join("first_longer_name.txt"), &root.join("moved.txt")),
        rec(&root.join("b.txt"), &root.join("busy.txt")),
    ]));

    assert_eq!(report.applied_count(), 1);
    assert_eq!(report.not_attempted_count(), 1);
    assert!(matches!(
        report.halt,
        Some(filesense_applier::Halt::DecisionFailed(
            filesense_applier::ApplierError::PromptClosed
        ))
    ));
    assert!(root.join("b.txt").exists());
}

#[test]
fn dry_run_plan_touches_nothing() {
    let td = tempdir().unwrap();
    let root = td.path();
    fs::create_dir_all(root.join("a")).unwrap();
    fs::write(root.join("a").join("b.txt"), "x").unwrap();
    fs::write(root.join("z"), "occupied").unwrap();
    let before = snapshot(root);

    let report = ops::plan(ops::prepare(vec![
        rec(&root.join("a").join("b.txt"), &root.join("a").join("c.txt")),
        rec(&root.join("a"), &root.join("z")),
    ]));

    assert_eq!(snapshot(root), before);
    assert_eq!(report.applied_count(), 2);
    let applied: Vec<_> = report.applied().collect();
    let forward = render_changelog(Shell::Posix, &applied);
    assert!(forward.contains(&format!("'{}'", root.join("z").display())));
}

#[cfg(unix)]
#[test]
fn revert_script_restores_layout_when_run_by_bash() {
    use std::process::Command;

    let work = tempdir().unwrap();
    let scripts = tempdir().unwrap();
    let root = work.path();
    fs::create_dir_all(root.join("photos").join("2024")).unwrap();
    fs::write(root.join("photos").join("2024").join("IMG 1.jpg"), "img").unwrap();
    fs::write(root.join("photos").join("it's.txt"), "q").unwrap();
    fs::write(root.join("taken.jpg"), "t").unwrap();
    let before = snapshot(root);

    let ops = ops::prepare(vec![
        rec(
            &root.join("photos").join("2024").join("IMG 1.jpg"),
            &root.join("photos").join("2024").join("beach.jpg"),
        ),
        rec(&root.join("photos").join("it's.txt"), &root.join("taken.jpg")),
        rec(&root.join("photos"), &root.join("pictures")),
    ]);
    let decider = ScriptedDecider::new([Decision::RenameTo("quote's.txt".into())]);
    let report = Engine::new(FsMover, decider).apply(ops);
    assert_eq!(report.applied_count(), 3);

    let applied: Vec<_> = report.applied().collect();
    let pair = filesense_applier::write_scripts(
        scripts.path(),
        &applied,
        Shell::Posix,
        &chrono::Local::now(),
    )
    .unwrap();

    let status = Command::new("bash").arg(&pair.revert).status().unwrap();
    assert!(status.success());
    assert_eq!(snapshot(root), before);

    // And forward again reproduces the applied layout.
    let status = Command::new("bash").arg(&pair.changelog).status().unwrap();
    assert!(status.success());
    assert!(root.join("pictures").join("2024").join("beach.jpg").exists());
    assert!(root.join("quote's.txt").exists());
}
