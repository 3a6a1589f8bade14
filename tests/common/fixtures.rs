//! Mock patent site: pages that link to PDFs, and the PDFs themselves

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Minimal PDF-looking body for an identifier
pub fn pdf_body(id: &str) -> Vec<u8> {
    format!("%PDF-1.4\n% {id}\n%%EOF\n").into_bytes()
}

/// URL the mock serves an identifier's PDF at
pub fn pdf_url(server: &MockServer, id: &str) -> String {
    format!("{}/pdfs/{}/{}.pdf", server.uri(), &id[..2], id)
}

/// Page HTML linking to the identifier's PDF
pub fn page_html(server: &MockServer, id: &str) -> String {
    format!(
        r#"<html><head><title>{id}</title></head><body>
<a href="{}">Download PDF</a>
<a href="{}/pdfs/other/{id}-drawings.pdf">Drawings</a>
</body></html>"#,
        pdf_url(server, id),
        server.uri()
    )
}

/// Serve a page that links to a PDF, and the PDF itself
pub async fn mount_patent(server: &MockServer, id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/patent/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_html(server, id)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/pdfs/{}/{}.pdf", &id[..2], id)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(pdf_body(id)))
        .mount(server)
        .await;
}

/// Serve a page for an identifier that has no PDF link
pub async fn mount_missing(server: &MockServer, id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/patent/{id}")))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html>Not found</html>"))
        .mount(server)
        .await;
}

/// Serve a page whose fetch fails with a server error
pub async fn mount_broken_page(server: &MockServer, id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/patent/{id}")))
        .respond_with(ResponseTemplate::new(503))
        .mount(server)
        .await;
}

/// Serve a page that links to a PDF the server refuses to deliver
pub async fn mount_refused_pdf(server: &MockServer, id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/patent/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_html(server, id)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/pdfs/{}/{}.pdf", &id[..2], id)))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
}
