// src/checker/markdown.rs
// =============================================================================
// This module turns Markdown into a small tree of nodes we can walk.
//
// We use the `pulldown-cmark` crate which:
// - Parses Markdown into events (heading, paragraph, link, etc.)
// - Follows the CommonMark specification
// - Is a streaming parser, so it never hands us a tree
//
// Link text can be nested ("[**bold** words](url)") and we need to find
// headings anywhere in a document, so we fold the event stream back into a
// tree once and walk that instead of juggling parser state in every caller.
//
// Only the node kinds the checker cares about are kept:
// - Link and Heading (what we search for)
// - Text (what we flatten)
// - Image (so its alt text is NOT flattened into a link's text)
// - Container (everything else: paragraphs, emphasis, lists, ...)
// =============================================================================

use pulldown_cmark::{Event, LinkType, Options, Parser, Tag};

/// One node of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Any block or inline wrapper we don't need to tell apart.
    Container(Vec<Node>),
    Heading(Vec<Node>),
    Link {
        destination: String,
        children: Vec<Node>,
    },
    Image(Vec<Node>),
    Text(String),
}

/// What a visitor wants the walk to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    SkipChildren,
    Stop,
}

impl Node {
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Container(children)
            | Node::Heading(children)
            | Node::Image(children)
            | Node::Link { children, .. } => children,
            Node::Text(_) => &[],
        }
    }

    /// Concatenates every text leaf below this node in document order.
    ///
    /// Text inside emphasis, strong, inline code and nested links is kept.
    /// Images are skipped along with their alt text.
    pub fn flatten_text(&self) -> String {
        let mut text = String::new();
        collect_text(self, &mut text);
        text
    }

    // Depth-first, parents before children. Returns false once a visitor asked to stop.
    fn walk<'a, F>(&'a self, visitor: &mut F) -> bool
    where
        F: FnMut(&'a Node) -> Walk,
    {
        match visitor(self) {
            Walk::Stop => return false,
            Walk::SkipChildren => return true,
            Walk::Continue => {}
        }
        for child in self.children() {
            if !child.walk(visitor) {
                return false;
            }
        }
        true
    }
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(text),
        Node::Image(_) => {}
        _ => node.children().iter().for_each(|child| collect_text(child, out)),
    }
}

/// A parsed document: the list of its top-level blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Node>,
}

impl Document {
    /// Visits every node in document order until the visitor returns `Walk::Stop`.
    pub fn walk<'a, F>(&'a self, mut visitor: F)
    where
        F: FnMut(&'a Node) -> Walk,
    {
        for block in &self.blocks {
            if !block.walk(&mut visitor) {
                return;
            }
        }
    }
}

/// Parses raw document bytes into a node tree.
///
/// This is the seam between the checker and the markdown grammar: the
/// extractor and resolver only ever see `Document`s.
pub trait DocumentParser: Send + Sync {
    fn parse(&self, content: &[u8]) -> Document;
}

/// `DocumentParser` backed by pulldown-cmark.
#[derive(Debug, Clone, Copy)]
pub struct CommonMarkParser {
    options: Options,
}

impl CommonMarkParser {
    pub fn with_options(options: Options) -> Self {
        Self { options }
    }
}

impl Default for CommonMarkParser {
    // GitHub renders tables, strikethrough and task lists, so we parse them too
    fn default() -> Self {
        Self::with_options(
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS,
        )
    }
}

impl DocumentParser for CommonMarkParser {
    fn parse(&self, content: &[u8]) -> Document {
        // Documents are bytes on disk; invalid UTF-8 is replaced, not rejected
        let markdown = String::from_utf8_lossy(content);

        // Stack of nodes still waiting for their End event.
        // The bottom entry collects the top-level blocks.
        let mut stack: Vec<Node> = vec![Node::Container(Vec::new())];

        for event in Parser::new_ext(&markdown, self.options) {
            match event {
                Event::Start(tag) => stack.push(open_node(tag)),
                Event::End(_) => {
                    if stack.len() > 1 {
                        if let Some(node) = stack.pop() {
                            push_child(&mut stack, node);
                        }
                    }
                }
                Event::Text(text) | Event::Code(text) => {
                    push_child(&mut stack, Node::Text(text.to_string()));
                }
                // Breaks, raw HTML, rules, footnote refs and task markers are not text
                _ => {}
            }
        }

        // A well-formed event stream leaves only the root, but fold anything
        // left open back into its parent rather than losing it
        while stack.len() > 1 {
            if let Some(node) = stack.pop() {
                push_child(&mut stack, node);
            }
        }

        let blocks = match stack.pop() {
            Some(Node::Container(blocks)) => blocks,
            _ => Vec::new(),
        };
        Document { blocks }
    }
}

fn open_node(tag: Tag<'_>) -> Node {
    match tag {
        Tag::Heading(..) => Node::Heading(Vec::new()),
        // <someone@example.com> carries the bare address as its destination
        Tag::Link(LinkType::Email, destination, _title) => Node::Link {
            destination: format!("mailto:{destination}"),
            children: Vec::new(),
        },
        Tag::Link(_link_type, destination, _title) => Node::Link {
            destination: destination.to_string(),
            children: Vec::new(),
        },
        Tag::Image(..) => Node::Image(Vec::new()),
        _ => Node::Container(Vec::new()),
    }
}

fn push_child(stack: &mut [Node], child: Node) {
    if let Some(parent) = stack.last_mut() {
        match parent {
            Node::Container(children)
            | Node::Heading(children)
            | Node::Image(children)
            | Node::Link { children, .. } => children.push(child),
            // Text never receives children, nothing opens one on the stack
            Node::Text(_) => {}
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait for the parser?
//    - The checker only needs "bytes in, tree out"
//    - Tests can hand-build trees, and another markdown flavour can be
//      plugged in without touching the extractor or resolver
//    - `Send + Sync` lets one parser be shared by every concurrent task
//
// 2. What is the 'a lifetime on walk?
//    - The visitor receives references into the tree
//    - 'a says those references live as long as the tree itself, so a
//      visitor may keep them (e.g. push them into a Vec) after returning
//
// 3. Why a stack?
//    - pulldown-cmark emits Start(tag) ... End(tag) pairs
//    - Start pushes an empty node, End pops it and attaches it to the node
//      below, which is the parent
// -----------------------------------------------------------------------------
