//! Template compilation and page rendering.

use minijinja::Environment;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const INDEX_TEMPLATE: &str = "index";

/// Parsed contents of the `<site>.json` data file.
///
/// List entries are opaque to the generator and handed to the template
/// unmodified.
#[derive(Debug, Clone, Deserialize)]
pub struct ListData {
    pub title: String,
    pub lists: Vec<Value>,
}

/// Values bound into the template for one render.
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext {
    pub title: String,
    pub lists: Vec<Value>,
    pub card_url: Option<String>,
}

impl RenderContext {
    pub fn new(data: ListData, card_url: Option<String>) -> Self {
        Self {
            title: data.title,
            lists: data.lists,
            card_url,
        }
    }
}

/// A compiled page template.
pub struct Template {
    env: Environment<'static>,
}

impl Template {
    /// Compile template source. Syntax errors surface here rather than at
    /// render time.
    pub fn compile(source: String) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template_owned(INDEX_TEMPLATE, source)?;
        Ok(Self { env })
    }

    pub fn render(&self, context: &RenderContext) -> Result<String, minijinja::Error> {
        self.env.get_template(INDEX_TEMPLATE)?.render(context)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn list_data() -> ListData {
        ListData {
            title: "My Lists".to_string(),
            lists: vec![json!("a"), json!("b")],
        }
    }

    #[test]
    fn renders_title_and_one_element_per_entry() {
        let template = Template::compile(
            "<h1>{{ title }}</h1>{% for l in lists %}<p>{{ l }}</p>{% endfor %}".to_string(),
        )
        .expect("valid template");

        let html = template
            .render(&RenderContext::new(list_data(), None))
            .expect("render");

        assert_eq!(html, "<h1>My Lists</h1><p>a</p><p>b</p>");
    }

    #[test]
    fn card_url_markup_only_appears_when_present() {
        let template = Template::compile(
            "{% if card_url %}<meta property=\"og:image\" content=\"{{ card_url }}\">{% endif %}"
                .to_string(),
        )
        .expect("valid template");

        let without = template
            .render(&RenderContext::new(list_data(), None))
            .expect("render");
        assert_eq!(without, "");

        let with = template
            .render(&RenderContext::new(
                list_data(),
                Some("https://lists.example.com/images/card.png".to_string()),
            ))
            .expect("render");
        assert_eq!(
            with,
            "<meta property=\"og:image\" content=\"https://lists.example.com/images/card.png\">"
        );
    }

    #[test]
    fn opaque_list_entries_pass_through() {
        let template = Template::compile(
            "{% for l in lists %}<li>{{ l.name }}: {{ l.count }}</li>{% endfor %}".to_string(),
        )
        .expect("valid template");

        let data = ListData {
            title: "t".to_string(),
            lists: vec![json!({"name": "books", "count": 3})],
        };
        let html = template
            .render(&RenderContext::new(data, None))
            .expect("render");

        assert_eq!(html, "<li>books: 3</li>");
    }

    #[test]
    fn syntax_errors_fail_compilation() {
        let err = Template::compile("{% for l in %}".to_string());
        assert!(err.is_err());
    }
}
