//! Settings for the filing processors.
//!
//! Loaded once at startup and handed to each processor as its own immutable slice. Sources, later
//! ones winning: built-in defaults, a TOML file (`--config`, else `$XDG_CONFIG_HOME/balderdash/config.toml`),
//! then `BALDERDASH__SECTION__KEY` environment variables (lists comma-separated).

use std::path::Path;

use config::{Environment, File, FileFormat};
use serde::Deserialize;
use smart_default::SmartDefault;

use crate::error::Result;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub task: TaskProcessorSettings,
	pub resource: ResourceProcessorSettings,
	pub acronym: AcronymProcessorSettings,
	pub meeting: MeetingProcessorSettings,
	pub block: BlockSettings,
}

#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct TaskProcessorSettings {
	#[default("# Todo".to_string())]
	pub header: String,
	#[default(vec!["#action".into(), "#follow-up".into(), "#think-about".into(), "#read".into()])]
	pub aliases: Vec<String>,
	/// Files the task into the current document instead of routing it.
	#[default("#here".to_string())]
	pub overwrite: String,
}

#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct ResourceProcessorSettings {
	#[default(vec![
		"#resource-lucid".into(),
		"#resource-docx".into(),
		"#resource-xlsx".into(),
		"#resource-pptx".into(),
		"#resource-http".into(),
		"#resource-pdf".into(),
		"#resource-confluence".into(),
		"#resource-teams".into(),
	])]
	pub aliases: Vec<String>,
	#[default("Resources.md".to_string())]
	pub file: String,
	#[default("# Resources".to_string())]
	pub header: String,
}

#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct AcronymProcessorSettings {
	#[default(vec!["#acronym".into()])]
	pub aliases: Vec<String>,
	#[default("Acronyms.md".to_string())]
	pub file: String,
	#[default("# Acronyms".to_string())]
	pub header: String,
}

#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct MeetingProcessorSettings {
	#[default("#meeting".to_string())]
	pub marker: String,
	/// Where the meeting is logged as a completed task.
	#[default("# Todo".to_string())]
	pub header: String,
}

#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct BlockSettings {
	/// Folder new block documents are created in.
	#[default("meetings".to_string())]
	pub note_folder: String,
	#[default("# Notes".to_string())]
	pub list_header: String,
}

const LIST_KEYS: [&str; 3] = ["task.aliases", "resource.aliases", "acronym.aliases"];

impl Settings {
	/// Load from `path` if given (it must exist), else from the XDG config file if there is one.
	pub fn load(path: Option<&Path>) -> Result<Self> {
		let file = match path {
			Some(path) => Some((path.to_path_buf(), true)),
			None => xdg::BaseDirectories::with_prefix("balderdash").find_config_file("config.toml").map(|p| (p, false)),
		};

		let mut builder = config::Config::builder();
		if let Some((file, required)) = file {
			tracing::debug!(path = %file.display(), "reading settings");
			builder = builder.add_source(File::from(file).format(FileFormat::Toml).required(required));
		}
		let mut env = Environment::with_prefix("BALDERDASH").separator("__").list_separator(",").try_parsing(true);
		for key in LIST_KEYS {
			env = env.with_list_parse_key(key);
		}
		let settings: Settings = builder.add_source(env).build()?.try_deserialize()?;
		Ok(settings.normalized())
	}

	/// Parse settings from a TOML string layered over the defaults.
	pub fn from_toml(toml: &str) -> Result<Self> {
		let settings: Settings = config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)).build()?.try_deserialize()?;
		Ok(settings.normalized())
	}

	/// Tags written without their `#` still mean the tag.
	fn normalized(mut self) -> Self {
		let lists = [&mut self.task.aliases, &mut self.resource.aliases, &mut self.acronym.aliases];
		for tag in lists.into_iter().flatten().chain([&mut self.task.overwrite, &mut self.meeting.marker]) {
			if !tag.starts_with('#') {
				tracing::warn!("tag {tag:?} in settings has no leading '#'; treating it as #{tag}");
				*tag = format!("#{tag}");
			}
		}
		self
	}
}
