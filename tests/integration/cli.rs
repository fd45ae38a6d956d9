//! The compiled binary, driven over argv and stdin.

use crate::common::TestVault;

const TASKS: &str = "- [ ] stretch #habit\n- [x] done already\n- [ ] write report";

#[test]
fn test_cancel_all() {
	let vault = TestVault::new("");
	let (ok, stdout, stderr) = vault.run(&["cancel"], TASKS);
	assert!(ok, "{stderr}");

	let lines: Vec<_> = stdout.trim_end().lines().collect();
	assert_eq!(lines.len(), 3);
	assert!(lines[0].starts_with("- [-] stretch #habit ❌ "));
	assert_eq!(lines[1], "- [x] done already");
	assert!(lines[2].starts_with("- [-] write report ❌ "));
}

#[test]
fn test_cancel_habits_only() {
	let vault = TestVault::new("");
	let (ok, stdout, stderr) = vault.run(&["cancel", "--habit"], TASKS);
	assert!(ok, "{stderr}");

	let lines: Vec<_> = stdout.trim_end().lines().collect();
	assert!(lines[0].starts_with("- [-] stretch #habit ❌ "));
	assert_eq!(lines[2], "- [ ] write report");
}

#[test]
fn test_shell_init() {
	let vault = TestVault::new("");
	let (ok, stdout, stderr) = vault.run(&["shell-init", "bash"], "");
	assert!(ok, "{stderr}");
	assert!(stdout.contains(r#"alias bdb="wl-paste | balderdash block --file""#));
	assert!(stdout.contains("complete"));
}

#[test]
fn test_block_from_argument() {
	let vault = TestVault::new(
		r#"
		//- /Current.md
		# Sync
		#meeting
		notes
		"#,
	);
	let (ok, stdout, stderr) = vault.run(&["block", "--file", "Current.md", "--selection", "# Sync\n#meeting\nnotes"], "");
	assert!(ok, "{stderr}");

	assert_eq!(stdout.trim(), "meetings/Sync.md");
	assert_eq!(vault.read("meetings/Sync.md"), "\n\n#meeting\n\nnotes");
	let current = vault.read("Current.md");
	assert!(current.starts_with("# Sync\n\n![[meetings/Sync.md]]"), "{current}");
	assert!(current.contains("- [x] Sync #15m [[meetings/Sync.md]]"), "{current}");
}

#[test]
fn test_selection_from_stdin() {
	let vault = TestVault::new(
		r#"
		//- /Daily.md
		- #action call Bob #here
		"#,
	);
	let (ok, stdout, stderr) = vault.run(&["selection", "--file", "Daily.md"], "- #action call Bob #here");
	assert!(ok, "{stderr}");

	let line = stdout.trim_end();
	assert!(line.starts_with("- call Bob ^"), "{line}");
	assert!(vault.read("Daily.md").contains("# Todo\n\n- [ ] call Bob #15m [[Daily.md#^"));
}

#[test]
fn test_config_file_from_xdg() {
	let vault = TestVault::new(
		r#"
		//- /Daily.md
		- #action call Bob #here
		"#,
	);
	let config_dir = vault.config_home().join("balderdash");
	std::fs::create_dir_all(&config_dir).unwrap();
	std::fs::write(config_dir.join("config.toml"), "[task]\nheader = \"## Actions\"\n").unwrap();

	let (ok, _, stderr) = vault.run(&["selection", "--file", "Daily.md"], "- #action call Bob #here");
	assert!(ok, "{stderr}");
	assert!(vault.read("Daily.md").contains("## Actions\n\n- [ ] call Bob"));
}

#[test]
fn test_file_tasks() {
	let vault = TestVault::new(
		r#"
		//- /Daily.md
		//- /projects/Alpha.md
		---
		type: outcome
		---
		"#,
	);
	let (ok, stdout, stderr) = vault.run(&["file-tasks", "--file", "Daily.md"], "- [ ] ship it [[Alpha]]\n- [ ] stays here");
	assert!(ok, "{stderr}");

	assert_eq!(stdout.trim_end(), "- [ ] stays here #15m");
	assert!(vault.read("projects/Alpha.md").contains("# Todo\n\n- [ ] ship it [[Alpha]] #15m"));
}

#[test]
fn test_missing_document_fails() {
	let vault = TestVault::new("");
	let (ok, _, stderr) = vault.run(&["block", "--file", "Nope.md", "--selection", "# T\nx"], "");
	assert!(!ok);
	assert!(stderr.contains("Nope.md"), "{stderr}");
}
