//! HTML minification: drop comments, collapse insignificant whitespace.

use std::{cell::RefCell, rc::Rc};

use lol_html::{
    RewriteStrSettings, doc_comments, doc_text, element, errors::RewritingError,
    html_content::{ContentType, Element}, rewrite_str,
};

/// Elements whose text content is significant and must pass through
/// untouched.
const PRESERVED_CONTENT: &str = "pre, textarea, script, style";

/// Minify a rendered page. Comments are removed, whitespace-only text
/// between tags is dropped, and runs of whitespace inside text collapse to
/// a single space. Content inside `pre`, `textarea`, `script`, and `style`
/// is left as-is.
pub fn minify(html: &str) -> Result<String, RewritingError> {
    let preserve_depth = Rc::new(RefCell::new(0_usize));

    let track_preserved = {
        let preserve_depth = Rc::clone(&preserve_depth);
        element!(PRESERVED_CONTENT, move |el: &mut Element| {
            let Some(handlers) = el.end_tag_handlers() else {
                return Ok(());
            };

            *preserve_depth.borrow_mut() += 1;
            let preserve_depth = Rc::clone(&preserve_depth);
            handlers.push(Box::new(move |_end| {
                let mut depth = preserve_depth.borrow_mut();
                *depth = depth.saturating_sub(1);
                Ok(())
            }));
            Ok(())
        })
    };

    let collapse_text = {
        let preserve_depth = Rc::clone(&preserve_depth);
        doc_text!(move |chunk| {
            if *preserve_depth.borrow() > 0 {
                return Ok(());
            }

            let text = chunk.as_str();
            if text.chars().all(char::is_whitespace) {
                chunk.remove();
                return Ok(());
            }

            let collapsed = collapse_whitespace(text);
            if collapsed != text {
                // The chunk is existing markup text; re-inserting it as
                // HTML keeps entity references intact.
                chunk.replace(&collapsed, ContentType::Html);
            }
            Ok(())
        })
    };

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![track_preserved],
            document_content_handlers: vec![
                doc_comments!(|comment| {
                    comment.remove();
                    Ok(())
                }),
                collapse_text,
            ],
            ..RewriteStrSettings::default()
        },
    )
}

fn collapse_whitespace(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut in_run = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_run {
                output.push(' ');
                in_run = true;
            }
        } else {
            output.push(ch);
            in_run = false;
        }
    }
    output
}
