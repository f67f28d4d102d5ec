//! Table formatting utilities

use prettytable::{Cell, Row, Table};

/// Build a two-column property table
///
/// Rows with an empty value are left out.
pub fn property_table<'a>(rows: impl IntoIterator<Item = (&'a str, String)>) -> Table {
    let mut table = Table::new();
    table.set_format(*prettytable::format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(vec![
        Cell::new("Property").style_spec("b"),
        Cell::new("Value").style_spec("b"),
    ]));

    for (name, value) in rows {
        if value.is_empty() {
            continue;
        }
        table.add_row(Row::new(vec![Cell::new(name), Cell::new(&value).style_spec("r")]));
    }
    table
}
