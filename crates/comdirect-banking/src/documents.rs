use std::path::{Path, PathBuf};

use comdirect_api_base::exchange_bytes;
use comdirect_core::Client;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    paging::paginate,
    request::{get, segment},
    BankingError, DownloadReport, DownloadThrottle, Page, PageRequest,
};

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    pub document_id: String,
    pub name: String,
    pub date_creation: String,
    pub mime_type: String,
    pub deletable: bool,
    pub advertisement: bool,
    pub document_meta_data: DocumentMetaData,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentMetaData {
    pub archived: bool,
    pub already_read: bool,
    #[serde(rename = "predocumentExists")]
    pub pre_document_exists: bool,
}

impl Document {
    /// File name the document is saved under: `<dateCreation>-<name>.<mime subtype>`, with
    /// spaces and path separators in the name replaced by underscores.
    pub fn file_name(&self) -> String {
        let name: String = self
            .name
            .chars()
            .map(|c| if c == ' ' || c == '/' || c == '\\' { '_' } else { c })
            .collect();
        let extension = self
            .mime_type
            .split_once('/')
            .map_or("bin", |(_, subtype)| subtype);

        format!("{}-{}.{}", self.date_creation, name, extension)
    }
}

#[allow(missing_docs)]
pub struct DocumentsClient {
    pub(crate) client: Client,
}

impl DocumentsClient {
    /// One window of postbox documents.
    pub async fn documents(
        &self,
        paging: PageRequest,
        cancel: &CancellationToken,
    ) -> Result<Page<Document>, BankingError> {
        get(
            &self.client,
            "/api/messages/clients/user/v2/documents",
            &paging.query(),
            cancel,
        )
        .await
    }

    /// All postbox documents, fetched `page_size` at a time.
    pub async fn all_documents(
        &self,
        page_size: u64,
        cancel: &CancellationToken,
    ) -> Result<Page<Document>, BankingError> {
        paginate(
            PageRequest {
                first: 0,
                count: page_size,
            },
            |paging| self.documents(paging, cancel),
            |_| false,
        )
        .await
    }

    /// Download a document into `folder`, or the current directory when `None`. Returns the path
    /// of the written file.
    pub async fn download(
        &self,
        document: &Document,
        folder: Option<&Path>,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, BankingError> {
        let request = self.client.internal.authenticated_request_accepting(
            Method::GET,
            &format!(
                "/api/messages/v2/documents/{}",
                segment(&document.document_id)
            ),
            &document.mime_type,
        )?;

        let content = exchange_bytes(request, cancel).await?.value;

        let folder = match folder {
            Some(folder) => folder.to_path_buf(),
            None => std::env::current_dir()?,
        };
        let path = folder.join(document.file_name());
        tokio::fs::write(&path, content).await?;

        debug!(path = %path.display(), "document saved");
        Ok(path)
    }

    /// Download several documents, pausing between batches as configured by `throttle`.
    pub async fn download_all(
        &self,
        documents: &[Document],
        folder: Option<&Path>,
        throttle: DownloadThrottle,
        cancel: &CancellationToken,
    ) -> Result<DownloadReport, BankingError> {
        let mut report = DownloadReport::default();

        for (index, document) in documents.iter().enumerate() {
            let path = self.download(document, folder, cancel).await?;
            report.files.push(path);

            let remaining = documents.len() - index - 1;
            if throttle.pause_after(index + 1, remaining) {
                throttle.pause(cancel).await?;
                report.pauses += 1;
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_uses_date_name_and_subtype() {
        let document = Document {
            name: "Finanzreport Nr. 03".to_string(),
            date_creation: "2024-03-28".to_string(),
            mime_type: "application/pdf".to_string(),
            ..Default::default()
        };

        assert_eq!(document.file_name(), "2024-03-28-Finanzreport_Nr._03.pdf");
    }

    #[test]
    fn file_name_without_subtype() {
        let document = Document {
            name: "a/b".to_string(),
            date_creation: "2024-03-28".to_string(),
            mime_type: "unknown".to_string(),
            ..Default::default()
        };

        assert_eq!(document.file_name(), "2024-03-28-a_b.bin");
    }
}
