//! Text extraction from various file formats

use crate::error::{Result, ResumeCriticError};
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            ResumeCriticError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
        })?;

        if text.trim().is_empty() {
            return Err(ResumeCriticError::EmptyDocument(format!(
                "PDF '{}' appears to be empty or contains no extractable text",
                path.display()
            )));
        }
        Ok(text)
    }
}

/// Plain text, decoded as UTF-8 with invalid sequences replaced
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        self.markdown_to_text(&markdown_content)
    }
}

impl MarkdownExtractor {
    pub fn markdown_to_text(&self, markdown: &str) -> Result<String> {
        let parser = Parser::new(markdown);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        self.html_to_text(&html_output)
    }

    fn html_to_text(&self, html: &str) -> Result<String> {
        let text = html
            .replace("<br>", "\n")
            .replace("</p>", "\n\n")
            .replace("</li>", "\n");

        let re = Regex::new(r"<[^>]*>")?;
        let clean_text = re.replace_all(&text, "");

        // entities last, so escaped markup is not stripped as tags
        let decoded = clean_text
            .replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&");

        let lines: Vec<&str> = decoded
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        Ok(lines.join("\n"))
    }
}
