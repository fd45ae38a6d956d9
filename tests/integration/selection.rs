//! Filing lines in place, without moving them into a block document.

use balderdash::{Error, Settings};

use crate::common::TestVault;

#[tokio::test]
async fn test_overwrite_files_into_current_document() {
	let vault = TestVault::new(
		r#"
		//- /Daily.md
		# Daily

		- #action call Bob #here
		- note
		"#,
	);

	let processed = vault.pipeline().process_selection("- #action call Bob #here\n- note", "Daily.md").await.unwrap();

	assert_eq!(processed, "- call Bob ^x00001\n- note");
	insta::assert_snapshot!(vault.read("Daily.md"), @r"
	# Daily

	- call Bob ^x00001
	- note

	# Todo

	- [ ] call Bob #15m [[Daily.md#^x00001|🖇️]]
	");
}

#[tokio::test]
async fn test_task_routed_by_its_own_link() {
	let vault = TestVault::new(
		r#"
		//- /Daily.md
		- #follow-up pricing with [[Pat]] tomorrow
		//- /people/Pat.md
		---
		type: stakeholder
		---
		"#,
	);

	let processed = vault.pipeline().process_selection("- #follow-up pricing with [[Pat]] tomorrow", "Daily.md").await.unwrap();

	assert_eq!(processed, "- pricing with [[Pat]] tomorrow ^x00001");
	let pat = vault.read("people/Pat.md");
	assert!(pat.contains("# Todo\n\n- [ ] "), "{pat}");
	assert!(pat.contains("📅 2024-05-30"), "{pat}");
	assert!(pat.contains("[[Daily.md#^x00001|🖇️]]"), "{pat}");
	assert!(!vault.read("Daily.md").contains("# Todo"));
}

#[tokio::test]
async fn test_unroutable_task_is_left_alone() {
	let vault = TestVault::new(
		r#"
		//- /Daily.md
		- #action nowhere to go
		"#,
	);

	let processed = vault.pipeline().process_selection("- #action nowhere to go", "Daily.md").await.unwrap();

	assert_eq!(processed, "- #action nowhere to go");
	assert_eq!(vault.read("Daily.md"), "- #action nowhere to go\n");
}

#[tokio::test]
async fn test_custom_task_header() {
	let vault = TestVault::new(
		r#"
		//- /Daily.md
		- #action tidy up #here
		"#,
	);
	let settings = Settings::from_toml("[task]\nheader = \"## Actions\"").unwrap();

	balderdash::Pipeline::new(settings, vault.services()).process_selection("- #action tidy up #here", "Daily.md").await.unwrap();

	assert!(vault.read("Daily.md").contains("## Actions\n\n- [ ] tidy up #15m [[Daily.md#^x00001|🖇️]]"));
}

#[tokio::test]
async fn test_missing_document() {
	let vault = TestVault::new("");
	let err = vault.pipeline().process_selection("- #action x", "Daily.md").await.unwrap_err();
	assert!(matches!(err, Error::MissingDocument { .. }));
}
