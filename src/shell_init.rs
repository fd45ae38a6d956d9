use clap::{Args, CommandFactory};
use clap_complete::Shell as ClapShell;
use derive_more::derive::{Display, FromStr};

static EXE_NAME: &str = "balderdash";

#[derive(Clone, Debug, Args)]
pub struct ShellInitArgs {
	shell: Shell,
}
#[derive(Debug, Clone, Copy, Display, FromStr)]
enum Shell {
	Dash,
	Bash,
	Zsh,
	Fish,
}

impl Shell {
	fn aliases(&self, exe_name: &str) -> String {
		format!(
			r#"
# {exe_name}: file the clipboard as a block / in place
alias bdb="wl-paste | {exe_name} block --file"
alias bds="wl-paste | {exe_name} selection --file"

# {exe_name}: bulk task edits over stdin
alias bdc="{exe_name} cancel"
alias bdh="{exe_name} cancel --habit"
alias bdf="{exe_name} file-tasks --file"
"#
		)
	}

	fn to_clap_shell(self) -> ClapShell {
		match self {
			Shell::Dash => ClapShell::Bash, // Dash uses Bash completions
			Shell::Bash => ClapShell::Bash,
			Shell::Zsh => ClapShell::Zsh,
			Shell::Fish => ClapShell::Fish,
		}
	}

	fn completions(&self) -> String {
		let mut cmd = crate::Cli::command();
		let mut buffer = Vec::new();
		clap_complete::generate(self.to_clap_shell(), &mut cmd, EXE_NAME, &mut buffer);

		String::from_utf8(buffer).unwrap_or_else(|_| String::from("# Failed to generate completions"))
	}
}

pub fn output(args: ShellInitArgs) {
	let shell = args.shell;
	tracing::debug!(%shell, "emitting shell init");
	println!("{}\n{}", shell.aliases(EXE_NAME), shell.completions());
}
