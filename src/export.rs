use std::path::Path;

use serde_json::json;
use tracing::debug;

use crate::error::Result;
use crate::models::SankeyDiagram;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    debug!(path = %path.display(), bytes = content.len(), "wrote export");
    Ok(())
}

pub fn to_json(diagram: &SankeyDiagram) -> Result<String> {
    Ok(serde_json::to_string_pretty(diagram)?)
}

/// Single plotly Sankey trace built from the diagram's node and link lists.
pub fn plotly_trace(diagram: &SankeyDiagram) -> serde_json::Value {
    let nodes = &diagram.nodes;
    let links = &diagram.links;
    json!({
        "type": "sankey",
        "arrangement": "perpendicular",
        "node": {
            "thickness": 20,
            "align": "center",
            "pad": 25,
            "label": nodes.iter().map(|n| n.label.as_str()).collect::<Vec<_>>(),
            "color": nodes.iter().map(|n| n.color.as_str()).collect::<Vec<_>>(),
        },
        "link": {
            "source": links.iter().map(|l| l.source).collect::<Vec<_>>(),
            "target": links.iter().map(|l| l.target).collect::<Vec<_>>(),
            "label": links.iter().map(|l| l.label.as_str()).collect::<Vec<_>>(),
            "value": links.iter().map(|l| l.value).collect::<Vec<_>>(),
            "color": links.iter().map(|l| l.color.as_str()).collect::<Vec<_>>(),
        },
    })
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn to_html(diagram: &SankeyDiagram, title: &str) -> Result<String> {
    // `</` would end the script element early.
    let trace = serde_json::to_string(&plotly_trace(diagram))?.replace("</", "<\\/");
    let title = escape_html(title);
    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_CDN}"></script>
<style>html, body {{ margin: 0; height: 100%; }} #sankey {{ width: 100%; height: 100%; }}</style>
</head>
<body>
<div id="sankey"></div>
<script>
Plotly.newPlot("sankey", [{trace}], {{"title": {{"text": "{title}"}}}}, {{"responsive": true}});
</script>
</body>
</html>
"#
    ))
}

pub fn write_json(diagram: &SankeyDiagram, path: &Path) -> Result<()> {
    write_file(path, &to_json(diagram)?)
}

pub fn write_html(diagram: &SankeyDiagram, path: &Path, title: &str) -> Result<()> {
    write_file(path, &to_html(diagram, title)?)
}
