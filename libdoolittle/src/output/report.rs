use std::io::Write;

use crate::structs::Alignment;
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// The result of one run: a title, the optimal score and the alignments
/// (plus the guide tree when one was built).
#[derive(Clone, Debug, Default, Serialize)]
pub struct Report {
    pub title: String,
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guide_tree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ties: Option<usize>,
    pub alignments: Vec<Alignment>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_guide_tree(mut self, tree: impl ToString) -> Self {
        self.guide_tree = Some(tree.to_string());
        self
    }

    pub fn with_ties(mut self, ties: usize) -> Self {
        self.ties = Some(ties);
        self
    }

    pub fn with_alignments(mut self, alignments: Vec<Alignment>) -> Self {
        self.alignments = alignments;
        self
    }

    pub fn write_text(&self, out: &mut impl Write) -> Result<()> {
        writeln!(out, "== {}", self.title)?;

        if let Some(score) = self.score {
            writeln!(out, "maximal score: {score}")?;
        }

        if let Some(ref tree) = self.guide_tree {
            writeln!(out, "guide tree: {tree}")?;
        }

        if let Some(ties) = self.ties {
            writeln!(out, "ties during backtracking: {ties}")?;
        }

        if !self.alignments.is_empty() {
            writeln!(out, "number of alignments: {}", self.alignments.len())?;
        }

        for (idx, alignment) in self.alignments.iter().enumerate() {
            writeln!(out, "\nAlignment {}:", idx + 1)?;
            write!(out, "{}", alignment.render()?)?;
        }

        Ok(())
    }

    pub fn to_text(&self) -> Result<String> {
        let mut out: Vec<u8> = vec![];
        self.write_text(&mut out)?;
        String::from_utf8(out).context("report text is not valid UTF8")
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize report")
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => self.to_text(),
            ReportFormat::Json => self.to_json(),
        }
    }
}
