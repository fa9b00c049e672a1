//! show-item → tree

use super::LayoutCompiler;
use crate::error::TcaError;
use crate::resolver::FieldConfigResolver;
use crate::result::Result;
use crate::showitem::{self, ItemKind, ShowItem, SpecialToken};
use crate::table_type::merge_config;
use crate::tree::{ColumnConfig, FormTree, LayoutMeta};
use crate::{ColumnMap, PaletteMap};
use tracing::{debug, trace};

impl LayoutCompiler {
    /// Rebuild `tree` from a layout show-item
    ///
    /// `columns` is the stored column configuration the layout may reference;
    /// fields only referenced from palettes get an empty entry synthesized in
    /// it. `parent` is given for derived types: fields unknown to `columns` are
    /// then looked up in the parent table before being skipped.
    pub fn populate(
        &self,
        tree: &mut FormTree,
        layout: &str,
        palettes: &PaletteMap,
        columns: &mut ColumnMap,
        parent: Option<&mut dyn FieldConfigResolver>,
    ) -> Result<()> {
        let items = showitem::parse(layout);
        tree.reset();

        let starts_with_tab = items.first().is_some_and(|item| {
            showitem::classify(item) == ItemKind::Special(SpecialToken::Div)
        });
        if !starts_with_tab {
            tree.ensure_initial_tab()?;
        }

        let mut populator = Populator {
            tree,
            palettes,
            columns,
            parent,
            current_tab: None,
        };
        for item in &items {
            populator.apply(item)?;
        }

        populator.tree.ensure_initial_tab()?;
        debug!(
            "Populated tree with {} tabs and {} nodes from {} items",
            populator.tree.tab_ids().len(),
            populator.tree.len(),
            items.len()
        );
        Ok(())
    }
}

struct Populator<'a, 'r> {
    tree: &'a mut FormTree,
    palettes: &'a PaletteMap,
    columns: &'a mut ColumnMap,
    parent: Option<&'a mut (dyn FieldConfigResolver + 'r)>,
    current_tab: Option<String>,
}

impl Populator<'_, '_> {
    fn position(&self) -> String {
        match &self.current_tab {
            Some(tab) => format!("bottom:{tab}"),
            None => String::new(),
        }
    }

    fn apply(&mut self, item: &ShowItem) -> Result<()> {
        match showitem::classify(item) {
            ItemKind::Special(SpecialToken::Div) => self.open_tab(item),
            ItemKind::Special(SpecialToken::Palette) => self.add_palette(item),
            ItemKind::Special(SpecialToken::LineBreak) => {
                let position = self.position();
                self.tree.line_break(&position)?;
                Ok(())
            }
            ItemKind::Special(SpecialToken::Unknown(token)) => {
                Err(TcaError::unknown_special_item(token, item.join(";")))
            }
            ItemKind::Field(id) => {
                let position = self.position();
                self.add_field(id, &item[1..], &position, false)
            }
        }
    }

    fn open_tab(&mut self, item: &ShowItem) -> Result<()> {
        let id = self.tree.tab_ids().len().to_string();
        self.tree
            .tab(&id)?
            .meta(LayoutMeta::from_parts(&item[1..]));
        trace!("Opened tab '{}'", id);
        self.current_tab = Some(id);
        Ok(())
    }

    fn add_palette(&mut self, item: &ShowItem) -> Result<()> {
        if item.len() < 2 {
            debug!("Skipping palette item without palette id: '{}'", item.join(";"));
            return Ok(());
        }
        let palette_id = item[item.len() - 1].as_str();
        let palettes = self.palettes;
        let Some(palette_showitem) = palettes.get(palette_id) else {
            debug!("Skipping unknown palette '{}'", palette_id);
            return Ok(());
        };
        if self.tree.has_palette(palette_id) {
            debug!("Skipping re-declared palette '{}'", palette_id);
            return Ok(());
        }

        let position = self.position();
        let node_id = self
            .tree
            .palette(palette_id)?
            .meta(LayoutMeta::from_parts(&item[1..item.len() - 1]))
            .move_to(&position)?
            .into_id();
        let inside = format!("bottom:{node_id}");

        for inner in showitem::parse(palette_showitem) {
            match showitem::classify(&inner) {
                ItemKind::Special(SpecialToken::LineBreak) => {
                    self.tree.line_break(&inside)?;
                }
                ItemKind::Special(SpecialToken::Unknown(token)) => {
                    return Err(TcaError::unknown_special_item(token, inner.join(";")));
                }
                ItemKind::Special(_) => {
                    return Err(TcaError::misplaced_special_item(
                        inner.join(";"),
                        format!("palette '{palette_id}'"),
                    ));
                }
                ItemKind::Field(field_id) => {
                    self.add_field(field_id, &inner[1..], &inside, true)?;
                }
            }
        }
        Ok(())
    }

    /// Create or fetch a field and move it to `position`
    ///
    /// Unknown fields are skipped, or get an empty column entry when
    /// `synthesize` is set (palette members must stay renderable).
    fn add_field(
        &mut self,
        id: &str,
        meta: &[String],
        position: &str,
        synthesize: bool,
    ) -> Result<()> {
        if id.is_empty() {
            debug!("Skipping item without field id");
            return Ok(());
        }

        if self.tree.find_field(id).is_none() {
            let stored = self.columns.get(id).cloned();
            let inherited = self.parent.as_mut().and_then(|parent| parent.resolve(id));

            let config = match (inherited, stored) {
                (None, None) if synthesize => {
                    debug!("Synthesizing empty column config for palette field '{}'", id);
                    self.columns.insert(id.to_string(), ColumnConfig::new());
                    ColumnConfig::new()
                }
                (None, None) => {
                    debug!("Skipping unknown field '{}'", id);
                    return Ok(());
                }
                (Some(mut inherited), Some(stored)) => {
                    merge_config(&mut inherited, &stored);
                    inherited
                }
                (Some(config), None) | (None, Some(config)) => config,
            };
            self.tree.field_with(id, move || config)?;
        }

        self.tree
            .field(id)?
            .meta(LayoutMeta::from_parts(meta))
            .move_to(position)?;
        Ok(())
    }
}
