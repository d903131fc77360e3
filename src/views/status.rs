//! Status label and badge style derivation

use crate::models::{LoanStatus, StatusHue};

/// Turn a snake_case status token into a label: "pending_approval" becomes
/// "Pending Approval". Any token is accepted.
pub fn format_status(status: &str) -> String {
    status
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Badge classes for a raw status token. Unknown tokens get the "cleared" style.
pub fn status_color(status: &str) -> &'static str {
    LoanStatus::from(status).badge_class()
}

/// CSS rules backing every class [`StatusHue::badge_class`] can return
pub fn badge_stylesheet() -> String {
    let mut css = String::new();
    for hue in StatusHue::ALL {
        let ((r, g, b), (tr, tg, tb)) = hue.rgb();
        let name = hue.name();
        css.push_str(&format!(
            ".bg-{name}-500\\/10 {{ background-color: rgba({r}, {g}, {b}, 0.1); }}\n\
             .text-{name}-700 {{ color: rgb({tr}, {tg}, {tb}); }}\n\
             .border-{name}-500\\/20 {{ border-color: rgba({r}, {g}, {b}, 0.2); }}\n"
        ));
    }
    css
}
