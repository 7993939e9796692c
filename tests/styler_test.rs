use std::rc::Rc;

use orinium_pipeline::engine::css::values::{Color, Display};
use orinium_pipeline::engine::dom::{Dom, NodeId};
use orinium_pipeline::engine::styler::{ComputedStyle, Edges, FontWeight, TextAlign};
use orinium_pipeline::{StyleEngine, parse_css, parse_html};

fn styled(html: &str, css: &str) -> Dom {
    let mut dom = parse_html(html.as_bytes(), 1 << 20).unwrap().dom;
    StyleEngine::new(&parse_css(css)).apply(&mut dom);
    dom
}

fn first_child(dom: &Dom, id: NodeId) -> NodeId {
    dom.children(id)[0]
}

fn style(dom: &Dom, id: NodeId) -> Rc<ComputedStyle> {
    dom.style(id).cloned().unwrap()
}

#[test]
fn later_rule_of_equal_specificity_wins() {
    let dom = styled("<div>x</div>", "div { margin: 5px } div { margin: 9px }");
    let div = first_child(&dom, dom.root());
    assert_eq!(style(&dom, div).margin, Edges::uniform(9.0));
}

#[test]
fn higher_specificity_wins_regardless_of_order() {
    let dom = styled(
        r#"<p id="x" class="c">t</p>"#,
        "#x { color: red } .c { color: green } p { color: blue }",
    );
    let p = first_child(&dom, dom.root());
    assert_eq!(style(&dom, p).color, Color::rgb(255, 0, 0));
}

#[test]
fn user_agent_defaults_fill_unset_properties() {
    let dom = styled(
        "<body><h1>a</h1><a>b</a><li>c</li><th>d</th></body>",
        "h1 { margin: 0 }",
    );
    let body = first_child(&dom, dom.root());
    let body_style = style(&dom, body);
    assert_eq!(body_style.margin, Edges::uniform(8.0));
    assert_eq!(body_style.display, Display::Block);

    let children = dom.children(body).to_vec();
    let h1 = style(&dom, children[0]);
    assert_eq!(h1.font_size, 32.0);
    assert_eq!(h1.font_weight, FontWeight::Bold);
    assert_eq!(h1.margin, Edges::ZERO);

    let a = style(&dom, children[1]);
    assert_eq!(a.display, Display::Inline);
    assert_eq!(a.color, Color::BLUE);
    assert!(a.underline);

    assert_eq!(style(&dom, children[2]).display, Display::ListItem);

    let th = style(&dom, children[3]);
    assert!(th.is_bold());
    assert_eq!(th.text_align, TextAlign::Center);
}

#[test]
fn align_attribute_is_a_presentational_hint() {
    let dom = styled(
        r#"<div align="right">a</div><div align="right" class="l">b</div>"#,
        ".l { text-align: left }",
    );
    let divs = dom.children(dom.root()).to_vec();
    assert_eq!(style(&dom, divs[0]).text_align, TextAlign::Right);
    assert_eq!(style(&dom, divs[1]).text_align, TextAlign::Left);
}

#[test]
fn em_lengths_use_element_font_size() {
    let dom = styled("<div>x</div>", "div { font-size: 20px; padding: 0.5em }");
    let div = first_child(&dom, dom.root());
    assert_eq!(style(&dom, div).padding, Edges::uniform(10.0));
}

#[test]
fn every_node_is_styled() {
    let dom = styled("<div><p>a<b>b</b></p><!-- c --><span>d</span></div>", "");
    for id in dom.traverse() {
        assert!(dom.style(id).is_some(), "node {id} has no style");
    }
}

#[test]
fn border_shorthand_with_hex_color_survives_parsing() {
    let dom = styled(r#"<div class="b">x</div>"#, ".b { border: 2px solid #ff0000 }");
    let div = first_child(&dom, dom.root());
    let s = style(&dom, div);
    assert_eq!(s.border(), Edges::uniform(2.0));
    assert_eq!(s.border_color, Color::rgb(255, 0, 0));
}
