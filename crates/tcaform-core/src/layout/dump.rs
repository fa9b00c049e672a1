//! tree → show-item

use super::LayoutCompiler;
use crate::PaletteMap;
use crate::showitem::{self, DIV_ITEM, LINEBREAK_ITEM, PALETTE_ITEM, ShowItem};
use crate::tree::{FormTree, Node, NodeData};
use serde::Serialize;
use tracing::debug;

/// Compiled layout of one tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayoutDump {
    pub showitem: String,
    /// Show-item of every palette in the tree, keyed by palette name
    pub palettes: PaletteMap,
}

impl LayoutCompiler {
    /// Compile a tree back into show-item strings
    ///
    /// Line breaks directly inside a tab only position nodes in the tree;
    /// the show-item grammar knows line breaks inside palettes only, so they
    /// are not emitted.
    pub fn dump(&self, tree: &FormTree) -> LayoutDump {
        let mut items: Vec<ShowItem> = Vec::new();
        let mut palettes = PaletteMap::new();

        for tab in tree.tabs() {
            let mut item = leading(DIV_ITEM, tab);
            showitem::trim_trailing_empty(&mut item);
            items.push(item);

            for child in tree.children_of(tab.id()) {
                match child.data() {
                    NodeData::Field { .. } => items.push(field_item(child)),
                    NodeData::Palette { palette_id } => {
                        items.push(palette_item(child, palette_id));
                        palettes.insert(palette_id.clone(), palette_showitem(tree, child));
                    }
                    NodeData::LineBreak | NodeData::Tab => {}
                }
            }
        }

        debug!(
            "Dumped {} items and {} palettes",
            items.len(),
            palettes.len()
        );
        LayoutDump {
            showitem: showitem::serialize(&items),
            palettes,
        }
    }
}

fn leading(token: &str, node: &Node) -> ShowItem {
    std::iter::once(token.to_string())
        .chain(node.meta().iter().map(str::to_string))
        .collect()
}

fn field_item(node: &Node) -> ShowItem {
    let mut item = leading(node.id(), node);
    showitem::trim_trailing_empty(&mut item);
    item
}

fn palette_item(node: &Node, palette_id: &str) -> ShowItem {
    let mut item = leading(PALETTE_ITEM, node);
    if item.len() < 2 {
        item.push(String::new());
    }
    item.push(palette_id.to_string());
    item
}

fn palette_showitem(tree: &FormTree, palette: &Node) -> String {
    let items: Vec<ShowItem> = tree
        .children_of(palette.id())
        .filter_map(|child| match child.data() {
            NodeData::Field { .. } => Some(field_item(child)),
            NodeData::LineBreak => Some(vec![LINEBREAK_ITEM.to_string()]),
            NodeData::Palette { .. } | NodeData::Tab => None,
        })
        .collect();
    showitem::serialize(&items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{ColumnConfig, LayoutMeta};
    use crate::ColumnMap;
    use insta::assert_snapshot;

    fn populate(layout: &str, palettes: &[(&str, &str)], columns: &[&str]) -> FormTree {
        let palettes: PaletteMap = palettes
            .iter()
            .map(|(id, show)| (id.to_string(), show.to_string()))
            .collect();
        let mut columns: ColumnMap = columns
            .iter()
            .map(|id| (id.to_string(), ColumnConfig::new()))
            .collect();
        let mut tree = FormTree::new();
        LayoutCompiler::new()
            .populate(&mut tree, layout, &palettes, &mut columns, None)
            .unwrap();
        tree
    }

    #[test]
    fn test_dump_tabs_fields_and_palettes() {
        let tree = populate(
            "--div--;General, title;Title;;;, --palette--;Access;access ,--div--;Text;icon-text,bodytext",
            &[("access", "hidden;Hidden , --linebreak--, starttime")],
            &["title", "hidden", "starttime", "bodytext"],
        );
        let dump = LayoutCompiler::new().dump(&tree);

        assert_snapshot!(dump.showitem, @"--div--;General,title;Title,--palette--;Access;access,--div--;Text;icon-text,bodytext");
        assert_snapshot!(dump.palettes["access"], @"hidden;Hidden,--linebreak--,starttime");
    }

    #[test]
    fn test_dump_adds_default_tab() {
        let tree = populate("title,bodytext", &[], &["title", "bodytext"]);
        let dump = LayoutCompiler::new().dump(&tree);
        assert_eq!(dump.showitem, "--div--;general,title,bodytext");
        assert!(dump.palettes.is_empty());
    }

    #[test]
    fn test_tab_level_line_breaks_are_not_emitted() {
        let tree = populate("title,--linebreak--,bodytext", &[], &["title", "bodytext"]);
        assert_eq!(tree.children_of("0").count(), 3);

        let dump = LayoutCompiler::new().dump(&tree);
        assert_eq!(dump.showitem, "--div--;general,title,bodytext");
    }

    #[test]
    fn test_dump_unlabelled_palette() {
        let tree = populate("--palette--;;access", &[("access", "hidden")], &["hidden"]);
        let dump = LayoutCompiler::new().dump(&tree);
        assert_eq!(dump.showitem, "--div--;general,--palette--;;access");
    }

    #[test]
    fn test_dump_after_mutation() {
        let mut tree = populate(
            "--div--;General,title,bodytext",
            &[],
            &["title", "bodytext"],
        );
        tree.add_tab().unwrap().label("Extra");
        tree.palette("dates").unwrap().move_to("bottom:1").unwrap();
        tree.field("starttime").unwrap().move_to("bottom:palette:dates").unwrap();
        tree.line_break("bottom:palette:dates").unwrap();
        tree.field("endtime").unwrap().move_to("bottom:palette:dates").unwrap();
        tree.move_to("bodytext", "before:title").unwrap();
        tree.field("title")
            .unwrap()
            .label("Headline")
            .meta(LayoutMeta::from_parts(["Headline", "", "x"]));

        let dump = LayoutCompiler::new().dump(&tree);
        assert_snapshot!(dump.showitem, @"--div--;General,bodytext,title;Headline;;x,--div--;Extra,--palette--;;dates");
        assert_snapshot!(dump.palettes["dates"], @"starttime,--linebreak--,endtime");
    }

    #[test]
    fn test_populate_dump_populate_is_stable() {
        let layout = "--div--;General,title;Title,--palette--;Access;access,--div--;Text,bodytext";
        let palettes = [("access", "hidden,--linebreak--,starttime")];
        let columns = ["title", "hidden", "starttime", "bodytext"];

        let first = LayoutCompiler::new().dump(&populate(layout, &palettes, &columns));
        assert_eq!(
            showitem::parse(&first.showitem),
            showitem::parse(layout)
        );

        let again = LayoutCompiler::new().dump(&populate(&first.showitem, &palettes, &columns));
        assert_eq!(first, again);
    }
}
