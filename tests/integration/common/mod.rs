//! Shared test infrastructure for integration tests.
//!
//! Provides `TestVault` - a vault seeded from a v_fixtures string in a temp directory, with the
//! XDG directories of the binary pointed inside it, and helpers to run the pipeline in-process or
//! the compiled binary against it.
//!
//! # Example
//!
//! ```ignore
//! let vault = TestVault::new(r#"
//!     //- /projects/Alpha.md
//!     ---
//!     type: outcome
//!     ---
//!     //- /Todo.md
//! "#);
//! ```

use std::{
	ffi::OsStr,
	io::Write,
	path::{Path, PathBuf},
	process::{Command, Output, Stdio},
	sync::Arc,
};

use balderdash::{FixedClock, FsVault, KeywordDates, Pipeline, SequentialIds, Services, Settings};
use jiff::civil::date;
use v_fixtures::{Fixture, fs_standards::xdg::Xdg};

pub struct TestVault {
	/// The Xdg wrapper managing the temp directory; the vault is its root
	xdg: Xdg,
	pub store: Arc<FsVault>,
}

impl TestVault {
	pub fn new(fixture_str: &str) -> Self {
		let fixture = Fixture::parse(fixture_str);
		let xdg = Xdg::new(fixture.write_to_tempdir(), "balderdash");
		let store = Arc::new(FsVault::new(xdg.inner.root.clone()));
		Self { xdg, store }
	}

	pub fn root(&self) -> &Path {
		&self.xdg.inner.root
	}

	/// `$XDG_CONFIG_HOME` as the binary sees it.
	pub fn config_home(&self) -> PathBuf {
		self.xdg
			.env_vars()
			.into_iter()
			.find(|(key, _)| AsRef::<OsStr>::as_ref(key) == "XDG_CONFIG_HOME")
			.map(|(_, value)| PathBuf::from(AsRef::<OsStr>::as_ref(&value)))
			.unwrap()
	}

	pub fn write(&self, path: &str, contents: &str) {
		let absolute = self.root().join(path);
		std::fs::create_dir_all(absolute.parent().unwrap()).unwrap();
		std::fs::write(absolute, contents).unwrap();
	}

	pub fn read(&self, path: &str) -> String {
		std::fs::read_to_string(self.root().join(path)).unwrap_or_else(|e| panic!("reading {path}: {e}"))
	}

	/// Deterministic collaborators: ids `x…` counting from 1, today is 2024-05-29.
	pub fn services(&self) -> Services {
		Services::new(self.store.clone(), Arc::new(KeywordDates), Arc::new(SequentialIds::new("x")), Arc::new(FixedClock::new(date(2024, 5, 29))))
	}

	pub fn pipeline(&self) -> Pipeline {
		Pipeline::new(Settings::default(), self.services())
	}

	/// Run the binary against this vault with the XDG environment, feeding `stdin`. Returns (success, stdout, stderr).
	pub fn run(&self, args: &[&str], stdin: &str) -> (bool, String, String) {
		let mut cmd = Command::new(env!("CARGO_BIN_EXE_balderdash"));
		cmd.arg("--vault").arg(self.root()).args(args).env("RUST_LOG", "warn");
		for (key, value) in self.xdg.env_vars() {
			cmd.env(key, value);
		}
		let mut child = cmd.stdin(Stdio::piped()).stdout(Stdio::piped()).stderr(Stdio::piped()).spawn().unwrap();
		child.stdin.take().unwrap().write_all(stdin.as_bytes()).unwrap();
		let Output { status, stdout, stderr } = child.wait_with_output().unwrap();
		(status.success(), String::from_utf8_lossy(&stdout).into_owned(), String::from_utf8_lossy(&stderr).into_owned())
	}
}
