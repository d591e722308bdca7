use std::path::PathBuf;

use clap::Args;
use color_eyre::eyre::bail;
use comdirect_banking::{BankingClientExt, Document, DownloadThrottle, Page};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    auth::state::authenticated_client,
    command::CommandConfig,
    render::{CommandOutput, CommandResult, Tabular},
};

const NAME_WIDTH: usize = 30;

#[derive(Args, Clone)]
pub struct DocumentArgs {
    #[arg(help = "Restrict to these document ids")]
    pub ids: Vec<String>,

    #[arg(short = 'd', long, help = "Download the documents instead of listing them")]
    pub download: bool,

    #[arg(long, requires = "download", help = "Target folder, defaults to the current directory")]
    pub folder: Option<PathBuf>,

    #[arg(long, help = "Fetch every page")]
    pub all: bool,
}

impl DocumentArgs {
    pub async fn run(self, config: &CommandConfig, cancel: &CancellationToken) -> CommandResult {
        let client = authenticated_client(config, cancel).await?;
        let documents = client.banking().documents();

        let mut page = if self.all {
            documents.all_documents(config.paging.count, cancel).await?
        } else {
            documents.documents(config.paging, cancel).await?
        };

        if !self.ids.is_empty() {
            page.values.retain(|d| self.ids.contains(&d.document_id));
            if page.values.is_empty() {
                bail!("No document matches the given ids");
            }
        }

        if !self.download {
            return Ok(CommandOutput::table(Documents(page)));
        }

        let report = documents
            .download_all(
                &page.values,
                self.folder.as_deref(),
                DownloadThrottle::default(),
                cancel,
            )
            .await?;
        for file in &report.files {
            info!("Downloaded {}", file.display());
        }

        Ok(format!("Downloaded {} documents", report.files.len()).into())
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct Documents(Page<Document>);

impl Tabular for Documents {
    fn header(&self) -> Vec<&'static str> {
        vec!["ID", "NAME", "DATE", "OPENED", "TYPE"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.0
            .values
            .iter()
            .map(|d| {
                vec![
                    d.document_id.clone(),
                    short_name(&d.name),
                    d.date_creation.clone(),
                    d.document_meta_data.already_read.to_string(),
                    d.mime_type.clone(),
                ]
            })
            .collect()
    }

    fn caption(&self) -> Option<String> {
        Some(format!(
            "{} out of {}",
            self.0.values.len(),
            self.0.paging.matches
        ))
    }
}

fn short_name(name: &str) -> String {
    let name = name.replace(' ', "-");
    if name.chars().count() > NAME_WIDTH {
        let truncated: String = name.chars().take(NAME_WIDTH).collect();
        format!("{truncated}...")
    } else {
        name
    }
}
