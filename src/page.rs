use std::fmt::Write;
use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Local};

use crate::item::Item;

pub(crate) struct PageContext<'a> {
    pub site_title: &'a str,
    pub site_url: &'a str,
    pub items: &'a [Item],
    pub source_count: usize,
    pub generated_at: DateTime<Local>,
}

pub(crate) trait RenderPage {
    fn render(&self, ctx: &PageContext<'_>) -> anyhow::Result<String>;
}

/// Picks the template-backed renderer when `<dir>/index.html` exists,
/// otherwise the built-in minimal page.
pub(crate) fn select_renderer(template_dir: &Path) -> anyhow::Result<Box<dyn RenderPage>> {
    let path = template_dir.join("index.html");
    if path.exists() {
        let template = fs::read_to_string(&path)
            .with_context(|| format!("failed to read template {}", path.display()))?;
        Ok(Box::new(TemplatePage { template }))
    } else {
        Ok(Box::new(BuiltinPage))
    }
}

fn render_items(items: &[Item]) -> String {
    let mut out = String::new();
    for item in items {
        let local = item.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M");
        writeln!(
            out,
            "<li><a href=\"{}\" target=\"_blank\">{}</a> <small>{} · {}</small></li>",
            html_escape::encode_double_quoted_attribute(&item.link),
            html_escape::encode_text(&item.title),
            html_escape::encode_text(&item.source),
            local,
        )
        .unwrap();
    }
    out
}

/// Substitution over an external template file. Recognized placeholders:
/// {{site_title}}, {{site_url}}, {{total}}, {{feeds_count}},
/// {{generated_at}}, {{items}}.
pub(crate) struct TemplatePage {
    pub template: String,
}

impl RenderPage for TemplatePage {
    fn render(&self, ctx: &PageContext<'_>) -> anyhow::Result<String> {
        let html = self
            .template
            .replace(
                "{{site_title}}",
                &html_escape::encode_text(ctx.site_title),
            )
            .replace(
                "{{site_url}}",
                &html_escape::encode_double_quoted_attribute(ctx.site_url),
            )
            .replace("{{total}}", &ctx.items.len().to_string())
            .replace("{{feeds_count}}", &ctx.source_count.to_string())
            .replace(
                "{{generated_at}}",
                &ctx.generated_at.format("%Y-%m-%d %H:%M").to_string(),
            )
            .replace("{{items}}", &render_items(ctx.items));
        Ok(html)
    }
}

/// Fallback page used when no template is configured.
pub(crate) struct BuiltinPage;

impl RenderPage for BuiltinPage {
    fn render(&self, ctx: &PageContext<'_>) -> anyhow::Result<String> {
        let title = html_escape::encode_text(ctx.site_title);
        let mut out = String::new();

        writeln!(out, "<!doctype html>").unwrap();
        writeln!(out, "<html lang=\"en\">").unwrap();
        writeln!(out, "<head><meta charset=\"utf-8\"/>").unwrap();
        writeln!(out, "<title>{title}</title>").unwrap();
        writeln!(
            out,
            "<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\"/>"
        )
        .unwrap();
        writeln!(out, "<style>").unwrap();
        writeln!(
            out,
            "body{{font:14px/1.6 -apple-system,BlinkMacSystemFont,Segoe UI,Roboto,Helvetica,Arial;max-width:860px;margin:0 auto;padding:24px 16px;}}"
        )
        .unwrap();
        writeln!(
            out,
            "a{{color:#3366cc;text-decoration:none}}a:hover{{text-decoration:underline}}"
        )
        .unwrap();
        writeln!(out, "li{{border-bottom:1px solid #e5e5e5;padding:12px 0}}").unwrap();
        writeln!(out, "small{{color:#666}}").unwrap();
        writeln!(out, "</style></head><body>").unwrap();
        writeln!(out, "<h1>{title}</h1>").unwrap();
        writeln!(
            out,
            "<p>{} items · {} sources · generated {}</p>",
            ctx.items.len(),
            ctx.source_count,
            ctx.generated_at.format("%Y-%m-%d %H:%M"),
        )
        .unwrap();
        writeln!(
            out,
            "<p><a href=\"combined.xml\" target=\"_blank\">Subscribe to the combined feed</a></p>"
        )
        .unwrap();
        writeln!(out, "<ul>").unwrap();
        out.push_str(&render_items(ctx.items));
        writeln!(out, "</ul></body></html>").unwrap();

        Ok(out)
    }
}
