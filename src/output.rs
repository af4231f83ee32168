//! Common HTML output logic shared by the node page and the error pages.  All
//! text that comes from the build graph or the query tool must pass through
//! `escape_html` before it is placed inside an `F::T`.

pub struct Options<'a> {
    pub title: &'a str,
}

/// Replace the characters that are significant in HTML text and in
/// double- or single-quoted attribute values.
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `generate_formatted` input type that allows for hierarchical indentation and
/// not having to call to_string() on everything.
#[derive(Clone)]
pub enum F {
    /// Indents its children by one 2-spaced level.
    /// Use like `F::Indent(vec![...])`.
    Indent(Vec<F>),
    /// Doesn't indent its children.
    /// Use like `F::Seq(vec![...])`.
    Seq(Vec<F>),
    /// For when you don't have a 'static lifetime string literal that's part of
    /// the program source.  Frequently this is the result of a `format!` call.
    /// Use like `F::T(format!(r#"<h2>{}</h2>"#, escape_html(rule)))`.
    T(String),
    /// For string literals in the program.  Avoid having to type `to_string()`!
    /// Use like `F::S("<ul>")` or `F::S(r#"<td width="50">&nbsp;</td>"#)`.
    S(&'static str),
}

pub fn generate_formatted(out: &mut String, formatted: &F, indent: u32) {
    match *formatted {
        F::Indent(ref seq) => {
            for f in seq {
                generate_formatted(out, f, indent + 1);
            }
        }
        F::Seq(ref seq) => {
            for f in seq {
                generate_formatted(out, f, indent);
            }
        }
        F::T(ref text) => push_line(out, text, indent),
        F::S(text) => push_line(out, text, indent),
    }
}

fn push_line(out: &mut String, text: &str, indent: u32) {
    for _ in 0..indent {
        out.push_str("  ");
    }
    out.push_str(text);
    out.push('\n');
}

const STYLE: &str = r#"<style>
body {
    font-family: sans;
    font-size: 0.8em;
    margin: 4ex;
}
h1 {
    font-weight: normal;
    text-align: center;
    margin: 0;
}
h2 {
    font-weight: normal;
}
tt {
    font-family: WebKitHack, monospace;
}
ul {
    margin-top: 0;
    padding-left: 20px;
}
.error {
    color: #a00;
}
</style>"#;

/// Wrap `body` in a complete document.  The title is escaped here so callers
/// can pass raw node names.
pub fn generate_page(opt: &Options, body: F) -> String {
    let f = F::Seq(vec![
        F::S("<!DOCTYPE html>"),
        F::S(r#"<html lang="en-US">"#),
        F::S("<head>"),
        F::Indent(vec![
            F::S(r#"<meta charset="utf-8" />"#),
            F::T(format!("<title>{}</title>", escape_html(opt.title))),
            F::S(STYLE),
        ]),
        F::S("</head>"),
        F::S("<body>"),
        F::Indent(vec![body]),
        F::S("</body>"),
        F::S("</html>"),
    ]);

    let mut out = String::new();
    generate_formatted(&mut out, &f, 0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("foo.c"), "foo.c");
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
        assert_eq!(escape_html("?"), "?");
    }

    #[test]
    fn test_generate_formatted_indents() {
        let f = F::Seq(vec![
            F::S("<ul>"),
            F::Indent(vec![F::T(format!("<li>{}</li>", 1)), F::Indent(vec![F::S("deep")])]),
            F::S("</ul>"),
        ]);
        let mut out = String::new();
        generate_formatted(&mut out, &f, 0);
        assert_eq!(out, "<ul>\n  <li>1</li>\n    deep\n</ul>\n");
    }

    #[test]
    fn test_page_title_is_escaped() {
        let page = generate_page(&Options { title: "a<b" }, F::S("<p>hi</p>"));
        assert!(page.starts_with("<!DOCTYPE html>\n"));
        assert!(page.contains("<title>a&lt;b</title>"));
        assert!(page.contains("  <p>hi</p>\n"));
        assert!(page.trim_end().ends_with("</html>"));
    }
}
