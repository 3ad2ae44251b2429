//! Terminal rendering of a list view.

use comfy_table::Cell;
use comfy_table::CellAlignment;
use comfy_table::ContentArrangement;
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use datatable_lib::actions::ActionResolver;
use datatable_lib::columns::Align;
use datatable_lib::columns::Column;
use datatable_lib::columns::ColumnKind;
use datatable_lib::columns::ColumnSet;
use datatable_lib::fetch::ListState;
use datatable_lib::model::Item;
use datatable_lib::selection::TableSelection;

pub fn print_list(
    state: &ListState,
    selection: &TableSelection,
    columns: &ColumnSet,
    actions: &ActionResolver,
    grouped: bool,
) {
    if grouped {
        let mut offset = 0;
        for group in selection.groups() {
            let marker = if group.is_expanded { "▾" } else { "▸" };
            println!("{} {}", marker, group.label);
            if group.is_expanded {
                println!("{}", table(&group.items, offset, selection, columns, actions));
            }
            offset += group.count();
        }
    } else {
        println!("{}", table(selection.items(), 0, selection, columns, actions));
    }

    println!("{}", footer(state, selection));
}

fn table(
    items: &[Item],
    offset: usize,
    selection: &TableSelection,
    columns: &ColumnSet,
    actions: &ActionResolver,
) -> Table {
    let visible = columns.visible();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(visible.iter().map(|column| header(column)));

    for (i, item) in items.iter().enumerate() {
        let row_index = offset + i;
        table.add_row(visible.iter().map(|column| {
            let text = match column.kind {
                ColumnKind::Selection => checkbox(selection.is_selected(item)).to_string(),
                ColumnKind::Actions => action_labels(actions, item),
                ColumnKind::Index | ColumnKind::Data => column.cell_text(item, row_index),
            };
            Cell::new(text).set_alignment(alignment(column.align))
        }));
    }

    table
}

fn header(column: &Column) -> Cell {
    let title = match column.kind {
        ColumnKind::Selection => "",
        _ => column.title.as_str(),
    };
    Cell::new(title).set_alignment(alignment(column.align))
}

fn alignment(align: Align) -> CellAlignment {
    match align {
        Align::Start => CellAlignment::Left,
        Align::Center => CellAlignment::Center,
        Align::End => CellAlignment::Right,
    }
}

fn checkbox(selected: bool) -> &'static str {
    if selected { "[x]" } else { "[ ]" }
}

fn action_labels(actions: &ActionResolver, item: &Item) -> String {
    actions
        .actions_for(item)
        .iter()
        .filter(|action| action.is_enabled(item))
        .map(|action| action.label.as_str())
        .collect::<Vec<_>>()
        .join(" | ")
}

fn footer(state: &ListState, selection: &TableSelection) -> String {
    let mut footer = format!(
        "Page {} of {} · {} of {} items",
        state.page.current_page,
        state.page.total_pages,
        state.items.len(),
        state.page.total_items.max(state.items.len()),
    );

    let selected = selection.selected_count();
    if selected > 0 {
        let marker = if selection.all_selected() { "all" } else { "some" };
        footer.push_str(&format!(" · {selected} selected ({marker})"));
    }
    if state.has_more {
        footer.push_str(" · more available");
    }
    if let Some(error) = &state.error {
        footer.push_str(&format!(" · error: {error}"));
    }
    footer
}
