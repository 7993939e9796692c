//! Inline formatting context
//!
//! 1. 連続するインライン参加者から run を集める（透過的なインラインは中へ潜る）
//! 2. `InlineLineBuilder` が run を貪欲に行へ詰める
//! 3. 行揃えをした上で、各断片を持ち主のボックスへ書き戻す
//! 4. 後順で矩形を確定する（テキストは断片の和、透過インラインは子の和）

use std::rc::Rc;

use super::text::{self, TextPiece};
use super::{LayoutContext, intrinsic_width};
use crate::engine::bridge::graphics::Graphics;
use crate::engine::css::values::Length;
use crate::engine::renderer::render_node::{BoxKind, RenderBox, TextFragment};
use crate::engine::renderer::types::Rect;
use crate::engine::styler::{TextAlign, WhiteSpace};

#[derive(Debug, Clone, PartialEq)]
pub enum RunKind {
    Text(String),
    /// 不可分なボックス（inline-block、img、inset 付きのインライン）
    Atomic,
    /// `<br>`
    Break,
    /// 保持された改行
    LineBreak,
}

/// 行分割の最小単位
#[derive(Debug, Clone, PartialEq)]
pub struct InlineRun {
    /// 持ち主のボックスへの添字パス。先頭はインライングループ内の位置。
    pub owner: Vec<usize>,
    pub kind: RunKind,
    pub width: f32,
    pub height: f32,
    /// 行頭で捨ててよい空白
    pub collapsible: bool,
}

impl InlineRun {
    fn is_skippable_space(&self) -> bool {
        match &self.kind {
            RunKind::Text(t) => self.collapsible && text::is_collapsible_space(t),
            _ => false,
        }
    }
}

/// 行に置かれた run。矩形はインライン整形コンテキストの座標。
#[derive(Debug, Clone, PartialEq)]
pub struct LineFragment {
    pub run: usize,
    pub rect: Rect,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineBox {
    pub fragments: Vec<LineFragment>,
    pub y: f32,
    pub height: f32,
}

impl LineBox {
    fn right(&self) -> Option<f32> {
        self.fragments
            .iter()
            .map(|f| f.rect.right())
            .reduce(f32::max)
    }
}

/// インライングループの配置結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InlineFlow {
    pub height: f32,
    pub first_line_height: Option<f32>,
}

/// 貪欲な行分割
pub struct InlineLineBuilder<'a> {
    runs: &'a [InlineRun],
}

impl<'a> InlineLineBuilder<'a> {
    pub fn new(runs: &'a [InlineRun]) -> Self {
        Self { runs }
    }

    /// `start_x` から幅 `max_width` の範囲に run を並べる。
    ///
    /// 行頭でない run が右端を越えたら折り返す。`max_width` が 0 以下なら折り返さない。
    pub fn layout(&self, max_width: f32, start_x: f32) -> Vec<LineBox> {
        let right_edge = start_x + max_width;
        let mut lines = Vec::new();
        let mut line = LineBox::default();
        let mut cursor_x = start_x;
        let mut cursor_y = 0.0;

        for (i, run) in self.runs.iter().enumerate() {
            let at_line_start = line.fragments.is_empty() && cursor_x <= start_x;

            match run.kind {
                RunKind::LineBreak => {
                    line.height = line.height.max(run.height);
                    close_line(&mut lines, &mut line, &mut cursor_x, &mut cursor_y, start_x);
                    continue;
                }
                RunKind::Break => {
                    line.fragments.push(LineFragment {
                        run: i,
                        rect: Rect::new(cursor_x, cursor_y, 0.0, run.height),
                    });
                    line.height = line.height.max(run.height);
                    close_line(&mut lines, &mut line, &mut cursor_x, &mut cursor_y, start_x);
                    continue;
                }
                _ => {}
            }

            if at_line_start && run.is_skippable_space() {
                continue;
            }

            if max_width > 0.0 && !at_line_start && cursor_x + run.width > right_edge {
                close_line(&mut lines, &mut line, &mut cursor_x, &mut cursor_y, start_x);
                if run.is_skippable_space() {
                    continue;
                }
            }

            line.fragments.push(LineFragment {
                run: i,
                rect: Rect::new(cursor_x, cursor_y, run.width, run.height),
            });
            line.height = line.height.max(run.height);
            cursor_x += run.width;
        }

        if !line.fragments.is_empty() {
            close_line(&mut lines, &mut line, &mut cursor_x, &mut cursor_y, start_x);
        }

        lines
    }
}

fn close_line(
    lines: &mut Vec<LineBox>,
    line: &mut LineBox,
    cursor_x: &mut f32,
    cursor_y: &mut f32,
    start_x: f32,
) {
    let mut finished = std::mem::take(line);
    finished.y = *cursor_y;
    *cursor_y += finished.height;
    *cursor_x = start_x;
    lines.push(finished);
}

/// 行ごとに断片を右寄せ・中央寄せする
pub fn align_lines(lines: &mut [LineBox], align: TextAlign, right_edge: f32) {
    if align == TextAlign::Left {
        return;
    }

    for line in lines.iter_mut() {
        let Some(line_right) = line.right() else {
            continue;
        };
        let free = right_edge - line_right;
        if free <= 0.0 {
            continue;
        }
        let shift = match align {
            TextAlign::Center => free / 2.0,
            TextAlign::Right => free,
            TextAlign::Left => 0.0,
        };
        for fragment in &mut line.fragments {
            fragment.rect.x += shift;
        }
    }
}

enum Participation {
    Text,
    Break,
    Transparent,
    Atomic,
}

fn participation(b: &RenderBox) -> Participation {
    match b.kind {
        BoxKind::Text { .. } => Participation::Text,
        BoxKind::Break => Participation::Break,
        BoxKind::Inline if !b.style.has_insets() => Participation::Transparent,
        _ => Participation::Atomic,
    }
}

/// グループ内の全 run を文書順に集める。テキストの断片はここで捨てる。
pub fn collect_inline_runs(
    children: &mut [RenderBox],
    graphics: &dyn Graphics,
    ctx: &LayoutContext,
    available_width: f32,
) -> Vec<InlineRun> {
    let mut runs = Vec::new();
    for (i, child) in children.iter_mut().enumerate() {
        collect_from(child, vec![i], graphics, ctx, available_width, &mut runs);
    }
    runs
}

fn collect_from(
    b: &mut RenderBox,
    path: Vec<usize>,
    graphics: &dyn Graphics,
    ctx: &LayoutContext,
    available_width: f32,
    out: &mut Vec<InlineRun>,
) {
    match participation(b) {
        Participation::Text => {
            let style = Rc::clone(&b.style);
            let BoxKind::Text {
                text: content,
                fragments,
            } = &mut b.kind
            else {
                return;
            };
            fragments.clear();
            b.rect = Rect::default();

            let collapsible = style.white_space != WhiteSpace::Preserve;
            for piece in text::split_pieces(content, style.white_space) {
                match piece {
                    TextPiece::Word(word) => {
                        let (width, height) = text::measure_text(graphics, ctx, &style, &word);
                        out.push(InlineRun {
                            owner: path.clone(),
                            kind: RunKind::Text(word),
                            width,
                            height,
                            collapsible,
                        });
                    }
                    TextPiece::Newline => out.push(InlineRun {
                        owner: path.clone(),
                        kind: RunKind::LineBreak,
                        width: 0.0,
                        height: style.font_size,
                        collapsible: false,
                    }),
                }
            }
        }
        Participation::Break => {
            b.rect = Rect::default();
            out.push(InlineRun {
                owner: path,
                kind: RunKind::Break,
                width: 0.0,
                height: b.style.font_size,
                collapsible: false,
            });
        }
        Participation::Transparent => {
            b.rect = Rect::default();
            for (i, child) in b.children.iter_mut().enumerate() {
                let mut child_path = path.clone();
                child_path.push(i);
                collect_from(child, child_path, graphics, ctx, available_width, out);
            }
        }
        Participation::Atomic => {
            layout_atomic(b, graphics, ctx, available_width);
            out.push(InlineRun {
                owner: path,
                kind: RunKind::Atomic,
                width: b.rect.width,
                height: b.rect.height,
                collapsible: false,
            });
        }
    }
}

/// 不可分ボックスを縮小幅で配置する（位置は後で書き戻す）
fn layout_atomic(
    b: &mut RenderBox,
    graphics: &dyn Graphics,
    ctx: &LayoutContext,
    available_width: f32,
) {
    if matches!(b.kind, BoxKind::Image { .. }) {
        b.layout(graphics, Rect::new(0.0, 0.0, available_width, 0.0), ctx);
        return;
    }

    let width = match b.style.width {
        Some(width @ Length::Percent(_)) => b.style.resolve_length(width, available_width),
        _ => intrinsic_width(b, graphics, ctx),
    };
    b.layout(graphics, Rect::new(0.0, 0.0, width, 0.0), ctx);
}

/// 1 つの断片を持ち主のボックスへ書き戻す
pub fn apply_inline_fragment(
    children: &mut [RenderBox],
    fragment: &LineFragment,
    run: &InlineRun,
    dy: f32,
) {
    let Some((first, rest)) = run.owner.split_first() else {
        return;
    };
    let Some(owner) = children
        .get_mut(*first)
        .and_then(|b| b.descendant_mut(rest))
    else {
        log::warn!(target: "Layouter::Inline", "Run owner {:?} not found", run.owner);
        return;
    };

    let rect = fragment.rect.translate(0.0, dy);
    match &run.kind {
        RunKind::Text(text) => {
            if let BoxKind::Text { fragments, .. } = &mut owner.kind {
                fragments.push(TextFragment {
                    rect,
                    text: text.clone(),
                });
            }
        }
        RunKind::Atomic => {
            owner.rect.x = rect.x;
            owner.rect.y = rect.y;
        }
        RunKind::Break => owner.rect = rect,
        RunKind::LineBreak => {}
    }
}

/// 後順で矩形を確定する。配置された内容があれば `true`。
pub fn finalize_inline_layout(b: &mut RenderBox) -> bool {
    match participation(b) {
        Participation::Text => {
            let BoxKind::Text { fragments, .. } = &mut b.kind else {
                return false;
            };
            let Some(bounds) = fragments.iter().map(|f| f.rect).reduce(|a, r| a.union(&r)) else {
                b.rect = Rect::default();
                return false;
            };
            for fragment in fragments.iter_mut() {
                fragment.rect = fragment.rect.translate(-bounds.x, -bounds.y);
            }
            b.rect = bounds;
            true
        }
        Participation::Transparent => {
            let mut bounds: Option<Rect> = None;
            for child in b.children.iter_mut() {
                if finalize_inline_layout(child) {
                    bounds = Some(match bounds {
                        Some(u) => u.union(&child.rect),
                        None => child.rect,
                    });
                }
            }
            match bounds {
                Some(bounds) => {
                    b.rect = bounds;
                    offset_inline_layout(b, -bounds.x, -bounds.y);
                    true
                }
                None => {
                    b.rect = Rect::default();
                    false
                }
            }
        }
        Participation::Break | Participation::Atomic => true,
    }
}

/// 直下の子を平行移動する（孫は子からの相対位置なので動かさない）
fn offset_inline_layout(b: &mut RenderBox, dx: f32, dy: f32) {
    for child in b.children.iter_mut() {
        child.rect = child.rect.translate(dx, dy);
    }
}

/// 連続するインライン参加者を `start_x` / `top` から配置し、使った高さを返す
pub fn layout_inline_group(
    children: &mut [RenderBox],
    graphics: &dyn Graphics,
    ctx: &LayoutContext,
    start_x: f32,
    top: f32,
    content_width: f32,
    align: TextAlign,
) -> InlineFlow {
    let runs = collect_inline_runs(children, graphics, ctx, content_width);
    let mut lines = InlineLineBuilder::new(&runs).layout(content_width, start_x);

    if !ctx.probing {
        align_lines(&mut lines, align, start_x + content_width);
    }

    for line in &lines {
        for fragment in &line.fragments {
            if let Some(run) = runs.get(fragment.run) {
                apply_inline_fragment(children, fragment, run, top);
            }
        }
    }

    for child in children.iter_mut() {
        finalize_inline_layout(child);
    }

    log::debug!(
        target: "Layouter::Inline",
        "{} runs -> {} lines (width {content_width})",
        runs.len(),
        lines.len()
    );

    InlineFlow {
        height: lines.iter().map(|l| l.height).sum(),
        first_line_height: lines.first().map(|l| l.height),
    }
}

/// ブロックの外で単独にレイアウトされたテキスト
pub fn layout_standalone(
    b: &mut RenderBox,
    graphics: &dyn Graphics,
    bounds: Rect,
    ctx: &LayoutContext,
) {
    layout_inline_group(
        std::slice::from_mut(b),
        graphics,
        ctx,
        0.0,
        0.0,
        bounds.width,
        TextAlign::Left,
    );
    b.rect = b.rect.translate(bounds.x, bounds.y);
}
