//! HTML for the node page and for request-scoped error pages.

use crate::output::{escape_html, generate_page, Options, F};
use crate::parse::NodeRecord;
use crate::url_encode_path::target_href;

fn node_link(name: &str) -> F {
    F::T(format!(
        r#"<li><tt><a href="{}">{}</a></tt></li>"#,
        escape_html(&target_href(name)),
        escape_html(name)
    ))
}

fn link_list(names: &[String]) -> F {
    F::Seq(vec![
        F::S("<ul>"),
        F::Indent(names.iter().map(|name| node_link(name)).collect()),
        F::S("</ul>"),
    ])
}

/// Render the page for one node: how it is built on the left, what consumes
/// it on the right.  Every name links back into the browser.
pub fn render(record: &NodeRecord) -> String {
    let built_by = match &record.producing_rule {
        Some(rule) => F::Seq(vec![
            F::T(format!(
                "<h2>built by rule: <tt>{}</tt></h2>",
                escape_html(rule)
            )),
            F::S("inputs:"),
            link_list(&record.inputs),
        ]),
        None => F::S("<h2>no input rule</h2>"),
    };

    let groups = record
        .outputs
        .iter()
        .map(|group| {
            F::Seq(vec![
                F::T(format!("<tt>{}</tt>", escape_html(&group.consuming_rule))),
                link_list(&group.dependents),
            ])
        })
        .collect::<Vec<_>>();

    let body = F::Seq(vec![
        F::S(r#"<table width="500">"#),
        F::Indent(vec![
            F::S(r#"<tr><td colspan="3">"#),
            F::Indent(vec![F::T(format!(
                "<h1><tt>{}</tt></h1>",
                escape_html(&record.name)
            ))]),
            F::S("</td></tr>"),
            F::S("<tr>"),
            F::Indent(vec![
                F::S(r#"<td valign="top" class="inputs">"#),
                F::Indent(vec![built_by]),
                F::S("</td>"),
                F::S(r#"<td width="50">&nbsp;</td>"#),
                F::S(r#"<td valign="top" class="dependents">"#),
                F::Indent(vec![F::S("<h2>dependents</h2>"), F::Seq(groups)]),
                F::S("</td>"),
            ]),
            F::S("</tr>"),
        ]),
        F::S("</table>"),
    ]);

    generate_page(
        &Options {
            title: &record.name,
        },
        body,
    )
}

/// Render an error page for a request that couldn't be answered.  `target`
/// is whatever the user asked for, which may well not be a real node.
pub fn render_error(target: &str, heading: &str, detail: &str) -> String {
    let body = F::Seq(vec![
        F::T(format!("<h1><tt>{}</tt></h1>", escape_html(target))),
        F::T(format!(r#"<h2 class="error">{}</h2>"#, escape_html(heading))),
        F::T(format!("<pre>{}</pre>", escape_html(detail))),
    ]);

    generate_page(&Options { title: target }, body)
}
