//! Configuration layout report
//!
//! A hierarchical, walkable report of the resolved options: cards at the
//! top, then groups and leaf entries carrying `(content, content_type,
//! doc_link)`. Validation tooling consumes the serialized form
//! (`.configuration_layout.json`), so the tree is built once and read-only
//! afterwards.

use serde::Serialize;

use crate::cli::RunOptions;
use crate::context::ResolvedContext;
use crate::docs;

/// Value shape of a leaf entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContentType {
    #[serde(rename = "SIMPLE")]
    Simple,
    #[serde(rename = "LIST")]
    List,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Simple => f.write_str("SIMPLE"),
            ContentType::List => f.write_str("LIST"),
        }
    }
}

/// Leaf entry of the layout tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutEntry {
    pub inner_title: String,
    pub content: String,
    pub content_type: ContentType,
    pub doc_link: String,
}

/// Node of a card: either a named group of nodes or a leaf entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LayoutNode {
    Group {
        inner_title: String,
        content: Vec<LayoutNode>,
    },
    Entry(LayoutEntry),
}

impl LayoutNode {
    fn entry(
        title: &str,
        content: impl Into<String>,
        content_type: ContentType,
        doc_link: String,
    ) -> Self {
        LayoutNode::Entry(LayoutEntry {
            inner_title: title.to_string(),
            content: content.into(),
            content_type,
            doc_link,
        })
    }

    /// Title of the node, group or entry alike
    pub fn inner_title(&self) -> &str {
        match self {
            LayoutNode::Group { inner_title, .. } => inner_title,
            LayoutNode::Entry(entry) => &entry.inner_title,
        }
    }
}

/// Top-level section of the layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub card_title: String,
    pub content: Vec<LayoutNode>,
}

impl Card {
    /// Direct child entry by title
    pub fn entry(&self, title: &str) -> Option<&LayoutEntry> {
        self.content.iter().find_map(|node| match node {
            LayoutNode::Entry(entry) if entry.inner_title == title => Some(entry),
            _ => None,
        })
    }

    /// Direct child group's content by title
    pub fn group(&self, title: &str) -> Option<&[LayoutNode]> {
        self.content.iter().find_map(|node| match node {
            LayoutNode::Group {
                inner_title,
                content,
            } if inner_title == title => Some(content.as_slice()),
            _ => None,
        })
    }
}

/// The full configuration layout report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigurationLayout {
    pub cards: Vec<Card>,
}

impl ConfigurationLayout {
    /// Card by title
    pub fn card(&self, title: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.card_title == title)
    }
}

/// Find an entry inside a group's content by title.
pub fn entry_in<'a>(nodes: &'a [LayoutNode], title: &str) -> Option<&'a LayoutEntry> {
    nodes.iter().find_map(|node| match node {
        LayoutNode::Entry(entry) if entry.inner_title == title => Some(entry),
        _ => None,
    })
}

/// Build the layout report for a resolved run.
pub fn build_layout(context: &ResolvedContext, options: &RunOptions) -> ConfigurationLayout {
    let files_card = Card {
        card_title: "files".to_string(),
        content: context
            .files
            .iter()
            .map(|file| {
                LayoutNode::entry(
                    "files",
                    file.display().to_string(),
                    ContentType::Simple,
                    docs::solana_files_url(),
                )
            })
            .collect(),
    };

    let mut flags = vec![LayoutNode::entry(
        "server",
        options.conf.effective_server().to_string(),
        ContentType::Simple,
        docs::cli_option_url("server"),
    )];
    if let Some(version) = &options.conf.prover_version {
        flags.push(LayoutNode::entry(
            "prover_version",
            version.clone(),
            ContentType::Simple,
            docs::cli_option_url("prover_version"),
        ));
    }
    if let Some(script) = &options.conf.build_script {
        flags.push(LayoutNode::entry(
            "build_script",
            script.clone(),
            ContentType::Simple,
            docs::cli_option_url("build_script"),
        ));
    }
    if options.conf.cargo_build {
        flags.push(LayoutNode::entry(
            "cargo_build",
            "true",
            ContentType::Simple,
            docs::cli_option_url("cargo_build"),
        ));
    }
    if !context.inlining.is_empty() {
        flags.push(LayoutNode::entry(
            "solana_inlining",
            join_paths(&context.inlining),
            ContentType::List,
            docs::cli_option_url("solana_inlining"),
        ));
    }
    if !context.summaries.is_empty() {
        flags.push(LayoutNode::entry(
            "solana_summaries",
            join_paths(&context.summaries),
            ContentType::List,
            docs::cli_option_url("solana_summaries"),
        ));
    }

    let mut general_content = vec![LayoutNode::Group {
        inner_title: "flags".to_string(),
        content: flags,
    }];
    if let Some(rule) = &options.conf.rule {
        general_content.push(LayoutNode::entry(
            "rule",
            rule.clone(),
            ContentType::Simple,
            docs::cli_option_url("rule"),
        ));
    }

    let general_card = Card {
        card_title: "general".to_string(),
        content: general_content,
    };

    ConfigurationLayout {
        cards: vec![files_card, general_card],
    }
}

fn join_paths(paths: &[std::path::PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
