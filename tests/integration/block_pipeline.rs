//! A meeting block run through the whole pipeline against a vault on disk.

use balderdash::{DocumentStore, Error};

use crate::common::TestVault;

const FRAGMENT: &str = "## Weekly sync
[[Alpha]] #role/pm
#meeting #45m

- #action draft the plan
- Pricing deck #resource-pdf
- SLO - service level objective #acronym
free text";

fn vault() -> TestVault {
	let vault = TestVault::new(
		r###"
		//- /projects/Alpha.md
		---
		type: outcome
		---
		# Alpha
		//- /people/Pat.md
		---
		type: role
		key: "#role/pm"
		---
		//- /Resources.md
		//- /Acronyms.md
		# Acronyms
		"###,
	);
	vault.write("Current.md", &format!("# Standup notes\n\n{FRAGMENT}\n"));
	vault
}

#[tokio::test]
async fn test_block_is_moved_and_filed() {
	let vault = vault();
	let outcome = vault.pipeline().process_block(FRAGMENT, "Current.md").await.unwrap();

	assert_eq!(outcome.new_document.path(), "meetings/Weekly sync.md");
	assert_eq!(outcome.block.id(), "x000000001");
	let routed: Vec<_> = outcome.destinations.iter().map(|d| d.document.path()).collect();
	assert_eq!(routed, vec!["projects/Alpha.md", "people/Pat.md"]);

	insta::assert_snapshot!(vault.read("meetings/Weekly sync.md"), @r"
	[[Alpha]]
	#role/pm

	#meeting
	#45m

	- draft the plan ^x00002
	- Pricing deck ^x00003
	- SLO - service level objective ^x00004
	free text
	");

	insta::assert_snapshot!(vault.read("Current.md"), @r"
	# Standup notes

	## Weekly sync

	![[meetings/Weekly sync.md]]

	# Resources

	- 2024-05-29 - Pricing deck[[meetings/Weekly sync.md#^x00003|🖇️]]

	# Acronyms

	- 2024-05-29 - SLO - service level objective[[meetings/Weekly sync.md#^x00004|🖇️]]

	# Todo

	- [x] Weekly sync [[Alpha]] #role/pm #45m [[meetings/Weekly sync.md]]
	");

	insta::assert_snapshot!(vault.read("projects/Alpha.md"), @r"
	---
	type: outcome
	---
	# Alpha

	# Todo

	- [ ] draft the plan [[Alpha]] #role/pm #15m [[meetings/Weekly sync.md#^x00002|🖇️]]

	# Notes

	## Weekly sync

	![[Weekly sync]]
	");

	assert!(vault.read("people/Pat.md").ends_with("# Notes\n\n## [[Weekly sync]]\n\n"));
	assert_eq!(vault.read("Resources.md"), "# resource-pdf\n\n- 2024-05-29 - Pricing deck[[meetings/Weekly sync.md#^x00003|🖇️]]\n\n");
	assert_eq!(vault.read("Acronyms.md"), "# Acronyms\n\n- 2024-05-29 - SLO - service level objective[[meetings/Weekly sync.md#^x00004|🖇️]]\n\n");
}

#[tokio::test]
async fn test_reprocessing_filed_lines_changes_nothing() {
	let vault = vault();
	let outcome = vault.pipeline().process_block(FRAGMENT, "Current.md").await.unwrap();
	let before: Vec<_> = ["Current.md", "projects/Alpha.md", "Resources.md", "Acronyms.md"].iter().map(|p| vault.read(p)).collect();

	let body = outcome.block.body().to_string();
	let processed = vault.pipeline().process_selection(&body, outcome.new_document.path()).await.unwrap();

	assert_eq!(processed, body);
	let after: Vec<_> = ["Current.md", "projects/Alpha.md", "Resources.md", "Acronyms.md"].iter().map(|p| vault.read(p)).collect();
	assert_eq!(before, after);
}

#[tokio::test]
async fn test_existing_block_document_is_reused() {
	let vault = vault();
	vault.write("meetings/Weekly sync.md", "old contents\n");
	let outcome = vault.pipeline().process_block(FRAGMENT, "Current.md").await.unwrap();

	assert_eq!(outcome.new_document.path(), "meetings/Weekly sync.md");
	assert!(vault.read("meetings/Weekly sync.md").starts_with("[[Alpha]]\n#role/pm\n\n#meeting\n#45m\n\n- draft the plan ^x"));
}

#[tokio::test]
async fn test_headerless_block_gets_a_synthesized_title() {
	let vault = vault();
	let fragment = "#meeting\nquick hallway chat";
	vault.write("Current.md", &format!("{fragment}\n"));

	let outcome = vault.pipeline().process_block(fragment, "Current.md").await.unwrap();

	assert_eq!(outcome.block.header().title, "x000000001");
	assert_eq!(outcome.new_document.path(), "meetings/x000000001.md");
	assert!(outcome.destinations.is_empty());
	assert!(vault.read("Current.md").starts_with("# 2024-05-29 - x000000001\n\n![[meetings/x000000001.md]]"));
	assert!(vault.read("Current.md").contains("- [x] x000000001 #15m [[meetings/x000000001.md]]"));
}

#[tokio::test]
async fn test_missing_current_document() {
	let vault = vault();
	let err = vault.pipeline().process_block(FRAGMENT, "Nope.md").await.unwrap_err();
	assert!(matches!(err, Error::MissingDocument { ref path } if path == "Nope.md"));
	assert!(vault.store.get("meetings/Weekly sync.md").await.is_none());
}
