use clap::ValueEnum;
use color_eyre::eyre::Result;
use comdirect_cli::Color;
use comfy_table::{presets::ASCII_MARKDOWN, Table};

use crate::command::Cli;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum Output {
    Markdown,
    Csv,
    Json,
}

/// Data that can be shown as a table as well as serialized as JSON.
pub trait Tabular: erased_serde::Serialize {
    fn header(&self) -> Vec<&'static str>;
    fn rows(&self) -> Vec<Vec<String>>;

    /// Line printed below a markdown table, e.g. the number of entries or totals.
    fn caption(&self) -> Option<String> {
        None
    }
}

erased_serde::serialize_trait_object!(Tabular);

pub enum CommandOutput {
    Plain(String),
    Object(Box<dyn Tabular>),
}
pub type CommandResult = color_eyre::eyre::Result<CommandOutput>;

impl From<&str> for CommandOutput {
    fn from(text: &str) -> Self {
        CommandOutput::Plain(text.to_owned())
    }
}
impl From<String> for CommandOutput {
    fn from(text: String) -> Self {
        CommandOutput::Plain(text)
    }
}
impl From<()> for CommandOutput {
    fn from(_: ()) -> Self {
        CommandOutput::Plain(String::new())
    }
}

impl CommandOutput {
    pub fn table(value: impl Tabular + 'static) -> Self {
        CommandOutput::Object(Box::new(value))
    }
}

pub struct RenderConfig {
    pub output: Output,
    pub color: Color,
}

impl RenderConfig {
    pub fn new(cli: &Cli) -> Self {
        Self {
            output: cli.format,
            color: cli.color,
        }
    }

    pub fn render_result(&self, result: CommandResult) -> Result<()> {
        match result {
            // Errors will be passed through to the caller, and rendered by the main function
            Err(e) => Err(e),

            Ok(CommandOutput::Plain(text)) => {
                if !text.is_empty() {
                    println!("{}", text);
                }
                Ok(())
            }

            Ok(CommandOutput::Object(obj)) => {
                print!("{}", self.format(&*obj)?);
                Ok(())
            }
        }
    }

    fn format(&self, obj: &dyn Tabular) -> Result<String> {
        Ok(match self.output {
            Output::Json => {
                let mut json = serde_json::to_string_pretty(obj)?;
                json.push('\n');
                json
            }
            Output::Csv => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                writer.write_record(obj.header())?;
                for row in obj.rows() {
                    writer.write_record(row)?;
                }
                String::from_utf8(writer.into_inner().map_err(|e| e.into_error())?)?
            }
            Output::Markdown => {
                let mut table = Table::new();
                table.load_preset(ASCII_MARKDOWN).set_header(obj.header());
                if !self.color.is_enabled() {
                    table.force_no_tty();
                }
                for row in obj.rows() {
                    table.add_row(row);
                }

                let mut text = format!("{table}\n");
                if let Some(caption) = obj.caption() {
                    text.push('\n');
                    text.push_str(&caption);
                    text.push('\n');
                }
                text
            }
        })
    }
}
