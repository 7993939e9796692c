//! Table layout
//!
//! 1 パス目で各セルを十分広い幅で仮配置して列幅（列ごとの最大内在幅）を求め、
//! 2 パス目でセルを列幅の和で配置する。colspan を持つセルは列数を増やすだけで、
//! 列幅の決定には参加しない。

use std::rc::Rc;

use super::block::block_height;
use super::{LayoutContext, intrinsic_width};
use crate::engine::bridge::graphics::Graphics;
use crate::engine::renderer::render_node::{BoxKind, RenderBox};
use crate::engine::renderer::render_tree::MAX_COLSPAN;
use crate::engine::renderer::types::Rect;

fn colspan(cell: &RenderBox) -> usize {
    match cell.kind {
        BoxKind::TableCell { colspan } => colspan.clamp(1, MAX_COLSPAN),
        _ => 1,
    }
}

/// 行へのパス。直下の行か、セクション内の行。
fn row_paths(table: &RenderBox) -> Vec<Vec<usize>> {
    let mut paths = Vec::new();
    for (i, child) in table.children.iter().enumerate() {
        match child.kind {
            BoxKind::TableRow => paths.push(vec![i]),
            BoxKind::TableSection => {
                for (j, row) in child.children.iter().enumerate() {
                    if row.is_table_row() {
                        paths.push(vec![i, j]);
                    }
                }
            }
            _ => {}
        }
    }
    paths
}

/// 1 パス目: 列ごとの最大内在幅
pub fn measure_columns(
    table: &mut RenderBox,
    graphics: &dyn Graphics,
    ctx: &LayoutContext,
) -> Vec<f32> {
    let mut columns: Vec<f32> = Vec::new();

    for path in row_paths(table) {
        let Some(row) = table.descendant_mut(&path) else {
            continue;
        };
        let mut col: usize = 0;
        for cell in row.children.iter_mut().filter(|c| c.is_table_cell()) {
            let span = colspan(cell);
            let width = intrinsic_width(cell, graphics, ctx);
            let end = col.saturating_add(span);
            if columns.len() < end {
                columns.resize(end, 0.0);
            }
            if span == 1 {
                columns[col] = columns[col].max(width);
            }
            col = end;
        }
    }

    columns
}

/// 2 パス目: 行内のセルを列幅で並べ、行の高さ（最も高いセル）にそろえる
fn layout_row(
    row: &mut RenderBox,
    graphics: &dyn Graphics,
    ctx: &LayoutContext,
    columns: &[f32],
    bounds: Rect,
) {
    let mut x = 0.0;
    let mut col: usize = 0;
    let mut height: f32 = 0.0;

    for cell in row.children.iter_mut() {
        if !cell.is_table_cell() {
            cell.rect = Rect::default();
            continue;
        }
        let span = colspan(cell);
        let next = col.saturating_add(span);
        let end = next.min(columns.len());
        let width: f32 = columns.get(col.min(end)..end).map_or(0.0, |c| c.iter().sum());

        cell.layout(graphics, Rect::new(x, 0.0, width, 0.0), ctx);
        height = height.max(cell.rect.height);
        x += width;
        col = next;
    }

    for cell in row.children.iter_mut().filter(|c| c.is_table_cell()) {
        cell.rect.height = height;
    }

    row.rect = Rect::new(bounds.x, bounds.y, bounds.width, height);
}

pub fn layout_table(
    b: &mut RenderBox,
    graphics: &dyn Graphics,
    bounds: Rect,
    ctx: &LayoutContext,
) {
    let style = Rc::clone(&b.style);
    let attr_width = match b.kind {
        BoxKind::Table { attr_width } => attr_width,
        _ => None,
    };
    let insets = style.insets();

    let columns = measure_columns(b, graphics, ctx);
    let columns_width: f32 = columns.iter().sum();

    let mut y = insets.top;
    for child in b.children.iter_mut() {
        match child.kind {
            BoxKind::TableRow => {
                let row_bounds = Rect::new(insets.left, y, columns_width, 0.0);
                layout_row(child, graphics, ctx, &columns, row_bounds);
                y += child.rect.height;
            }
            BoxKind::TableSection => {
                let mut section_y = 0.0;
                for row in child.children.iter_mut() {
                    if !row.is_table_row() {
                        row.rect = Rect::default();
                        continue;
                    }
                    let row_bounds = Rect::new(0.0, section_y, columns_width, 0.0);
                    layout_row(row, graphics, ctx, &columns, row_bounds);
                    section_y += row.rect.height;
                }
                child.rect = Rect::new(insets.left, y, columns_width, section_y);
                y += section_y;
            }
            _ => child.rect = Rect::default(),
        }
    }

    let width = match style.width.filter(|w| !w.is_auto()).or(attr_width) {
        Some(width) => style.resolve_length(width, bounds.width).min(bounds.width),
        None => columns_width + insets.horizontal(),
    };
    let height = block_height(&style, y + insets.bottom, bounds.height);

    log::debug!(
        target: "Layouter::Table",
        "{} columns {:?}, {}x{}",
        columns.len(),
        columns,
        width,
        height
    );

    b.rect = Rect::new(bounds.x, bounds.y, width, height);
}
