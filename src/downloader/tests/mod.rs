use super::test_helpers::{
    FakeRetrieval, create_test_downloader, page_url, page_with_link, pdf_url,
};
use super::*;
use crate::types::DownloadOutcome;


fn ids(list: &[&str]) -> Vec<Identifier> {
    list.iter().map(|s| Identifier::parse(s).unwrap()).collect()
}

/// Fake serving a page and a PDF for each identifier
fn serving(list: &[&str]) -> FakeRetrieval {
    list.iter().fold(FakeRetrieval::new(), |fake, id| {
        fake.page(&page_url(id), &page_with_link(id))
            .file(&pdf_url(id), &[b"%PDF-1.4 ", id.as_bytes()])
    })
}
