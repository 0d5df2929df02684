use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use threatwire_core::Severity;

const STYLE: &str = r"
:root {
  --primary: #ff5a5a; --background: #0a0a0a; --surface: #1a1a1a; --card: #242424;
  --text: #ffffff; --text-secondary: #e5e5e5; --muted: #a0a0a0; --border: #333333;
}
* { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: Inter, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  background: var(--background); color: var(--text-secondary); line-height: 1.7; }
.container { max-width: 1100px; margin: 0 auto; padding: 0 1.5rem; }
.header { background: var(--surface); border-bottom: 1px solid var(--border); padding: 1.5rem 0; }
.logo { color: var(--primary); font-size: 1.6rem; }
.tagline { color: var(--muted); font-size: 0.9rem; }
.hero { position: relative; margin: 2rem 0; border-radius: 12px; overflow: hidden; background: var(--card); }
.hero-image { width: 100%; max-height: 380px; object-fit: cover; display: block; opacity: 0.55; }
.hero-overlay { position: absolute; inset: auto 0 0 0; padding: 2rem;
  background: linear-gradient(transparent, rgba(0, 0, 0, 0.9)); }
.article-title { color: var(--text); font-size: 2.2rem; line-height: 1.25; }
.article-meta { display: flex; flex-wrap: wrap; gap: 1rem; margin-top: 1rem; color: var(--muted); }
.threat-badge { padding: 0.2rem 0.8rem; border-radius: 999px; font-weight: 700; font-size: 0.8rem; color: #fff; }
.threat-critical { background: linear-gradient(135deg, #dc2626, #b91c1c); }
.threat-high { background: linear-gradient(135deg, #ea580c, #dc2626); }
.threat-medium { background: linear-gradient(135deg, #d97706, #ea580c); }
.threat-low { background: linear-gradient(135deg, #059669, #047857); }
.tags { list-style: none; display: flex; flex-wrap: wrap; gap: 0.5rem; margin-bottom: 2rem; }
.tags li { background: var(--card); border: 1px solid var(--border); border-radius: 6px;
  padding: 0.15rem 0.6rem; font-size: 0.8rem; color: var(--primary); }
.content { display: grid; grid-template-columns: minmax(0, 1fr) 260px; gap: 2rem; margin-bottom: 3rem; }
.lead { font-size: 1.15rem; color: var(--text); margin-bottom: 2rem; }
.article-section { margin-bottom: 2rem; }
.article-section h2 { color: var(--text); border-left: 4px solid var(--primary); padding-left: 0.75rem; margin-bottom: 1rem; }
h3 { color: var(--text); margin: 1.25rem 0 0.5rem; }
p, ul, ol { margin-bottom: 1rem; }
ul, ol { padding-left: 1.5rem; }
strong { color: var(--text); }
a { color: var(--primary); }
.source-section { background: var(--card); border-radius: 8px; padding: 1.25rem; margin-top: 2rem; }
.stats-sidebar { background: var(--surface); border: 1px solid var(--border); border-radius: 8px;
  padding: 1.25rem; align-self: start; position: sticky; top: 1rem; }
.stat-item { display: flex; justify-content: space-between; padding: 0.5rem 0; border-bottom: 1px solid var(--border); }
.stat-label { color: var(--muted); }
.footer { border-top: 1px solid var(--border); padding: 1.5rem 0; color: var(--muted); font-size: 0.85rem; }
@media (max-width: 768px) { .content { grid-template-columns: 1fr; } .article-title { font-size: 1.6rem; } }
";

pub(super) struct Page<'a> {
    pub title: &'a str,
    pub hero_image: &'a str,
    pub severity: Severity,
    pub tags: &'a [&'a str],
    /// Already-rendered HTML.
    pub body: &'a str,
    pub source_link: &'a str,
    pub published_at: Option<DateTime<Utc>>,
    pub content_chars: usize,
    pub generated_at: DateTime<Utc>,
}

impl Page<'_> {
    pub(super) fn to_html(&self) -> String {
        let severity = self.severity.as_str();
        let severity_class = severity.to_lowercase();
        let shown_date = self
            .published_at
            .unwrap_or(self.generated_at)
            .format("%d %B %Y");
        let tags: String = self
            .tags
            .iter()
            .map(|tag| format!("<li>{}</li>", text(tag)))
            .collect();
        let size_k = self.content_chars / 1000;

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<meta name="description" content="Cybersecurity analysis and threat intelligence">
<style>{STYLE}</style>
</head>
<body>
<header class="header">
<div class="container">
<h1 class="logo">Threatwire</h1>
<p class="tagline">Cybersecurity intelligence and threat analysis</p>
</div>
</header>
<main class="container">
<article class="article">
<div class="hero">
<img src="{hero}" alt="{title_attr}" class="hero-image">
<div class="hero-overlay">
<h1 class="article-title">{title}</h1>
<div class="article-meta">
<span>Cybersecurity Analysis</span>
<span>{shown_date}</span>
<span class="threat-badge threat-{severity_class}">{severity} THREAT</span>
</div>
</div>
</div>
<ul class="tags">{tags}</ul>
<div class="content">
<div class="main-content">
{body}<div class="source-section">
<h3>Source</h3>
<p><a href="{source}" target="_blank" rel="noopener">View original article</a></p>
</div>
</div>
<aside class="stats-sidebar">
<h3>Intelligence</h3>
<div class="stat-item"><span class="stat-label">Content</span><span class="stat-value">{size_k}k chars</span></div>
<div class="stat-item"><span class="stat-label">Threat level</span><span class="stat-value">{severity}</span></div>
</aside>
</div>
</article>
</main>
<footer class="footer">
<div class="container">
<p>Generated {generated} UTC</p>
</div>
</footer>
</body>
</html>
"#,
            title = text(self.title),
            title_attr = attr(self.title),
            hero = attr(self.hero_image),
            body = self.body,
            source = attr(self.source_link),
            generated = self.generated_at.format("%d %B %Y, %H:%M"),
        )
    }
}
