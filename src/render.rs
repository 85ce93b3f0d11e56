//! HTML page of a puzzle, one icon per card
//!
//! Icons are named `<count><fill><color><shape>.svg`, e.g. `2HrS.svg`, with
//! the codes below. The masked cell shows `empty.svg` instead of the answer.

use crate::puzzle::Puzzle;
use crate::set::{Attribute, Card};

pub const PLACEHOLDER_ICON: &str = "empty.svg";

fn color_code(value: u8) -> &'static str {
    ["r", "g", "p"][value as usize]
}

fn shape_code(value: u8) -> &'static str {
    ["S", "P", "D"][value as usize]
}

fn fill_code(value: u8) -> &'static str {
    ["H", "S", "O"][value as usize]
}

/// Path of the icon drawing `card`, relative to the page
pub fn icon_path(card: Card, base: &str) -> String {
    format!(
        "{}/{}{}{}{}.svg",
        base.trim_end_matches('/'),
        card.value(Attribute::Count) + 1,
        fill_code(card.value(Attribute::Fill)),
        color_code(card.value(Attribute::Color)),
        shape_code(card.value(Attribute::Shape)),
    )
}

/// Name of the image file of a puzzle: the answer's value names joined by
/// underscores
pub fn answer_artifact_name(answer: Card) -> String {
    format!("{}.png", answer.names().join("_"))
}

fn img_tag(path: &str) -> String {
    format!("<img src=\"{}\"/>", path)
}

/// Full HTML page of the puzzle
pub fn render_html(puzzle: &Puzzle, icons_base: &str) -> String {
    let arrangement = &puzzle.arrangement;
    let masked = puzzle.masked_cell();
    let placeholder = format!("{}/{}", icons_base.trim_end_matches('/'), PLACEHOLDER_ICON);

    let mut html = String::from("<html><body> \n");
    html.push_str("<div style='font-size:110px; color:white'>Prove you're not a robot</div><br><br>");
    html.push_str("<style> body{ background-color: #010101;}</style>\n");
    html.push_str("<table>\n<tbody>\n");
    for (r, row) in arrangement.rows().enumerate() {
        html.push_str("<tr>");
        for (c, card) in row.iter().enumerate() {
            let tag = if r * arrangement.grid().cols + c == masked {
                img_tag(&placeholder)
            } else {
                img_tag(&icon_path(*card, icons_base))
            };
            html.push_str(&format!("<td>{}</td>", tag));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>");
    html.push_str("</body></html>");
    html
}
