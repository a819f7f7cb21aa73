// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::debug;

/// 内容处理错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ContentError {
    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),

    #[error("No elements found for CSS selector: {0}")]
    NoMatch(String),
}

// Never useful as page content.
static EXCLUDED: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("script, style, noscript, iframe, svg, canvas, template, link, meta")
        .expect("static selector")
});

// Text blocks subject to the word-count threshold.
static TEXT_BLOCKS: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p, li, blockquote, dd, dt, figcaption").expect("static selector")
});

static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").expect("static selector"));

/// 校验 CSS 选择器语法
pub fn parse_selector(selector: &str) -> Result<Selector, ContentError> {
    Selector::parse(selector).map_err(|_| ContentError::InvalidSelector(selector.to_string()))
}

/// 清洗 HTML
///
/// 1. 有选择器时以匹配的元素为根，否则以 `<body>` 为根；选择器无匹配时返回 `NoMatch`
/// 2. 在根内移除脚本、样式等非内容元素以及注释
/// 3. 在根内移除词数低于 `word_count_threshold` 的文本块，根元素自身始终保留
pub fn clean_html(
    html: &str,
    css_selector: Option<&str>,
    word_count_threshold: usize,
) -> Result<String, ContentError> {
    let selector = css_selector.map(parse_selector).transpose()?;
    let mut document = Html::parse_document(html);

    let roots: Vec<_> = match (&selector, css_selector) {
        (Some(selector), Some(raw)) => {
            let matched: Vec<_> = document.select(selector).map(|el| el.id()).collect();
            if matched.is_empty() {
                return Err(ContentError::NoMatch(raw.to_string()));
            }
            matched
        }
        _ => vec![document
            .select(&BODY)
            .next()
            .unwrap_or_else(|| document.root_element())
            .id()],
    };

    let mut removable = Vec::new();
    let root_elements = roots
        .iter()
        .filter_map(|id| document.tree.get(*id))
        .filter_map(ElementRef::wrap);
    for root in root_elements {
        // select() only visits descendants, so roots are never pruned
        removable.extend(root.select(&EXCLUDED).map(|el| el.id()));
        removable.extend(
            root.descendants()
                .filter(|node| node.value().is_comment())
                .map(|node| node.id()),
        );
        if word_count_threshold > 0 {
            removable.extend(
                root.select(&TEXT_BLOCKS)
                    .filter(|el| word_count(el.text()) < word_count_threshold)
                    .map(|el| el.id()),
            );
        }
    }

    debug!(
        roots = roots.len(),
        removed = removable.len(),
        word_count_threshold,
        "Removing non-content nodes"
    );
    for id in removable {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    let parts: Vec<String> = roots
        .iter()
        .filter_map(|id| document.tree.get(*id))
        .filter_map(ElementRef::wrap)
        .map(|el| el.html())
        .collect();
    Ok(parts.join("\n"))
}

/// 将清洗后的 HTML 转为 Markdown，转换失败时返回 None
pub fn to_markdown(cleaned_html: &str) -> Option<String> {
    match htmd::convert(cleaned_html) {
        Ok(markdown) => Some(markdown),
        Err(e) => {
            debug!("Markdown conversion failed: {}", e);
            None
        }
    }
}

fn word_count<'a>(text: impl Iterator<Item = &'a str>) -> usize {
    text.map(|chunk| chunk.split_whitespace().count()).sum()
}
