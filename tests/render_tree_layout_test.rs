use orinium_pipeline::engine::bridge::graphics::{
    DrawCommand, Graphics, TextMeasureError, TextMeasureRequest, TextMetrics, TextStyle,
};
use orinium_pipeline::engine::css::values::Color;
use orinium_pipeline::engine::layouter::table::measure_columns;
use orinium_pipeline::engine::layouter::{LayoutContext, content_right};
use orinium_pipeline::engine::renderer::{BoxKind, Rect, RenderBox};
use orinium_pipeline::{
    FallbackGraphics, RenderTree, Renderer, StyleEngine, TreeBuilder, parse_css, parse_html,
};

fn build(html: &str, css: &str) -> RenderTree {
    let document = parse_html(html.as_bytes(), 1 << 20).unwrap();
    let mut sheet = parse_css(css);
    for block in &document.style_blocks {
        sheet.extend(parse_css(block));
    }
    let mut dom = document.dom;
    StyleEngine::new(&sheet).apply(&mut dom);
    TreeBuilder::build(&dom).unwrap()
}

fn layout(html: &str, css: &str, width: f32) -> RenderTree {
    let mut tree = build(html, css);
    tree.layout(&FallbackGraphics::new(), Rect::new(0.0, 0.0, width, 600.0));
    tree
}

/// 文字数に関係なく固定の大きさを返す計測器
struct MockGraphics;

impl Graphics for MockGraphics {
    fn measure_text(&self, req: &TextMeasureRequest<'_>) -> Result<TextMetrics, TextMeasureError> {
        Ok(TextMetrics {
            width: 50.0,
            height: req.font_size * 0.75,
            baseline: 9.0,
        })
    }
    fn draw_text(&mut self, _text: &str, _x: f32, _y: f32, _style: &TextStyle) {}
    fn fill_rect(&mut self, _rect: Rect, _color: Color) {}
    fn set_viewport(&mut self, _rect: Rect) {}
    fn clear(&mut self, _color: Color) {}
    fn present(&mut self) {}
}

#[test]
fn layout_uses_graphics_measurements() {
    let mut tree = build("<div>hello</div>", "");
    tree.layout(&MockGraphics, Rect::new(0.0, 0.0, 800.0, 600.0));
    let text = &tree.root.children[0].children[0];
    assert_eq!(text.rect, Rect::new(0.0, 0.0, 50.0, 12.0));
}

#[test]
fn missing_font_lays_out_with_zero_size() {
    let mut tree = build("<div>hello</div><div>x</div>", "");
    tree.layout(&FallbackGraphics::without_font(), Rect::new(0.0, 0.0, 800.0, 600.0));
    assert_eq!(tree.root.children[0].rect.height, 0.0);
    assert_eq!(tree.root.children[1].rect.y, 0.0);
}

#[test]
fn relayout_produces_identical_geometry() {
    let mut tree = layout(
        "<div>one <b>two</b> three<ul><li>x</li><li><p>y</p></li></ul><table><tr><td>a</td><td colspan=2>bb</td></tr></table></div>",
        "",
        200.0,
    );
    let first = tree.to_string();
    let g = FallbackGraphics::new();
    tree.layout(&g, Rect::new(0.0, 0.0, 200.0, 600.0));
    tree.layout(&g, Rect::new(0.0, 0.0, 200.0, 600.0));
    assert_eq!(tree.to_string(), first);
}

#[test]
fn narrow_block_wraps_words() {
    let tree = layout("<div>Hello Hello</div>", "div { width: 60px }", 800.0);
    let div = &tree.root.children[0];
    let text = &div.children[0];
    assert!(text.fragments().len() >= 2);
    assert!(div.rect.height >= 32.0);
    for fragment in text.fragments() {
        assert!(fragment.rect.right() <= 60.0);
    }
}

#[test]
fn table_columns_take_max_cell_width() {
    let mut tree = layout(
        "<table><tr><td>abc</td><td>d</td></tr><tr><td>a</td><td>defg</td></tr></table>",
        "",
        800.0,
    );
    let table = &tree.root.children[0];
    let row1 = &table.children[0];
    let row2 = &table.children[1];
    assert_eq!(row1.children[0].rect.width, 24.0);
    assert_eq!(row1.children[1].rect.width, 32.0);
    assert_eq!(row2.rect.y, row1.rect.height);

    let table = &mut tree.root.children[0];
    let columns = measure_columns(table, &FallbackGraphics::new(), &LayoutContext::default());
    assert_eq!(columns, vec![24.0, 32.0]);
}

#[test]
fn alignment_does_not_change_intrinsic_width() {
    let aligned = layout(
        "<table><tr><td align=center>ab</td></tr></table>",
        "",
        800.0,
    );
    let plain = layout("<table><tr><td>ab</td></tr></table>", "", 800.0);
    assert_eq!(aligned.root.children[0].rect.width, 16.0);
    assert_eq!(
        aligned.root.children[0].rect,
        plain.root.children[0].rect
    );
}

#[test]
fn alignment_applies_inside_wider_column() {
    let tree = layout(
        "<table><tr><td align=center>ab</td></tr><tr><td>abcdef</td></tr></table>",
        "",
        800.0,
    );
    let text = &tree.root.children[0].children[0].children[0].children[0];
    assert_eq!(text.rect.x, 16.0);
}

#[test]
fn colspan_cells_do_not_size_columns() {
    let mut tree = layout(
        "<table><tr><td>ab</td><td>abc</td><td>abcd</td></tr><tr><td colspan=3>x</td></tr></table>",
        "",
        800.0,
    );
    let table = &mut tree.root.children[0];
    assert_eq!(table.rect.width, 72.0);
    assert_eq!(table.children[1].children[0].rect.width, 72.0);

    let columns = measure_columns(table, &FallbackGraphics::new(), &LayoutContext::default());
    assert_eq!(columns, vec![16.0, 24.0, 32.0]);
}

#[test]
fn display_none_subtree_has_no_boxes() {
    let tree = layout(
        r#"<div><p class="hidden"><span>gone</span></p><p>kept</p></div>"#,
        ".hidden { display: none } p { margin: 0 }",
        800.0,
    );
    assert!(tree.boxes().iter().all(|b| b.text() != Some("gone")));
    let div = &tree.root.children[0];
    assert_eq!(div.children.len(), 1);
    assert_eq!(div.rect.height, 16.0);
}

#[test]
fn inline_block_shrinks_to_content() {
    let tree = layout(
        "<div>a <span class=ib>bcd</span> e</div>",
        ".ib { display: inline-block; padding: 2px }",
        800.0,
    );
    let div = &tree.root.children[0];
    let ib = &div.children[1];
    assert_eq!(ib.kind, BoxKind::InlineBlock);
    assert_eq!(ib.rect, Rect::new(16.0, 0.0, 28.0, 20.0));
    assert_eq!(content_right(ib), 26.0);
    assert_eq!(div.rect.height, 20.0);
}

#[test]
fn list_items_offset_content_for_marker() {
    let tree = layout("<ul><li>one</li><li>two</li></ul>", "", 800.0);
    let ul = &tree.root.children[0];
    let items: Vec<&RenderBox> = ul.children.iter().collect();
    assert_eq!(items[1].rect.y, 16.0);
    for item in items {
        let BoxKind::ListItem { marker } = item.kind else {
            panic!("expected list item");
        };
        assert_eq!(marker.x, 0.0);
        assert_eq!(item.rect.x, 20.0);
        assert_eq!(item.children[0].rect.x, 14.0);
    }
}

#[test]
fn preformatted_text_keeps_lines() {
    let tree = layout("<pre>\na  b\n\nc</pre>", "pre { margin: 0 }", 800.0);
    let pre = &tree.root.children[0];
    let text = &pre.children[0];
    let lines: Vec<&str> = text.fragments().iter().map(|f| f.text.as_str()).collect();
    assert_eq!(lines, vec!["a  b", "c"]);
    assert_eq!(text.fragments()[1].rect.y, 32.0);
    assert_eq!(pre.rect.height, 48.0);
}

#[test]
fn padded_inline_wraps_as_one_unit() {
    let tree = layout(
        "<div>aaaa <span class=p>bb cc</span></div>",
        ".p { padding: 4px } div { width: 60px }",
        800.0,
    );
    let div = &tree.root.children[0];
    let span = &div.children[1];
    assert_eq!(span.kind, BoxKind::Inline);
    assert_eq!(span.rect, Rect::new(0.0, 16.0, 48.0, 24.0));

    let words: Vec<&str> = span.children[0]
        .fragments()
        .iter()
        .map(|f| f.text.as_str())
        .collect();
    assert_eq!(words, vec!["bb ", "cc"]);
    assert_eq!(div.rect.height, 40.0);
}

#[test]
fn content_after_rule_is_painted() {
    let tree = layout("<body><p>before</p><hr><p>after</p></body>", "", 800.0);
    let commands = Renderer::new().generate_draw_commands(&tree, Rect::new(0.0, 0.0, 800.0, 600.0));
    let texts: Vec<&str> = commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::DrawText { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec!["before", "after"]);
}
