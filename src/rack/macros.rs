//! Macro control extraction.

use roxmltree::Node;

use super::types::MacroControl;
use crate::adg::QueryCache;

/// Macro knobs a rack can expose.
pub const MACRO_COUNT: usize = 16;

/// Label Live gives an untouched macro at `index`.
pub fn default_macro_name(index: usize) -> String {
    format!("Macro {}", index + 1)
}

/// Read the user-labeled macros of a rack's main device, in index order.
///
/// A macro whose trimmed display name equals its default label is left out.
/// A label with a non-numeric value is skipped with a warning.
pub fn extract_macros<'a, 'input>(
    queries: &QueryCache<'a, 'input>,
    main_device: Node<'a, 'input>,
    warnings: &mut Vec<String>,
) -> Vec<MacroControl> {
    let mut macros = Vec::new();

    for index in 0..MACRO_COUNT {
        let Some(label) = queries.first(main_device, &format!("MacroDisplayNames.{}", index))
        else {
            continue;
        };
        let default_name = default_macro_name(index);
        let name = label.attribute("Value").unwrap_or(default_name.as_str()).trim();
        if name == default_name {
            continue;
        }

        let value = match queries.value(main_device, &format!("MacroControls.{}/Manual", index)) {
            None => 0.0,
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    warnings.push(format!(
                        "Failed to parse macro {}: invalid value '{}'",
                        index, raw
                    ));
                    continue;
                }
            },
        };

        macros.push(MacroControl {
            name: name.to_string(),
            value,
            index,
        });
    }

    macros
}
