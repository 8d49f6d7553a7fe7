use ego_tree::NodeId;
use pretty_assertions::assert_eq;
use saver_engine::{resolve_group, GroupError, PageDom, FULL_GRID};

fn grid_page(image_srcs: &[String]) -> String {
    let cells: String = image_srcs
        .iter()
        .map(|src| format!(r#"<div class="cell"><img src="{src}"/></div>"#))
        .collect();
    format!(
        r#"<html><body><div id="page"><div id="grid">
<div id="toolbar"><button id="save">Save</button></div>
{cells}
</div></div></body></html>"#
    )
}

fn grid_urls(code: &str, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("https://cdn.test/styles/0_{code}/{i}_640_N.webp"))
        .collect()
}

fn control_of(dom: &PageDom) -> NodeId {
    dom.descendant_elements(dom.root(), "button")
        .into_iter()
        .next()
        .expect("control present")
}

#[test]
fn resolves_a_full_grid() {
    let urls = grid_urls("777123", FULL_GRID);
    let dom = PageDom::parse(&grid_page(&urls));

    let group = resolve_group(&dom, control_of(&dom)).expect("group resolves");
    assert_eq!(group.sref.as_str(), "777123");
    assert_eq!(group.image_urls, urls);
}

#[test]
fn deduplicates_repeated_sources() {
    let mut urls = grid_urls("42", FULL_GRID);
    urls.push(urls[0].clone());
    let dom = PageDom::parse(&grid_page(&urls));

    let group = resolve_group(&dom, control_of(&dom)).expect("group resolves");
    assert_eq!(group.image_urls.len(), FULL_GRID);
    assert_eq!(group.image_urls, urls[..FULL_GRID]);
}

#[test]
fn rejects_a_partially_loaded_grid() {
    let urls = grid_urls("777123", 5);
    let dom = PageDom::parse(&grid_page(&urls));

    let err = resolve_group(&dom, control_of(&dom)).unwrap_err();
    assert_eq!(
        err,
        GroupError::NotFullyLoaded {
            expected: FULL_GRID,
            found: 5
        }
    );
}

#[test]
fn fails_without_a_group_root() {
    let urls = grid_urls("777123", 3);
    let dom = PageDom::parse(&grid_page(&urls));

    let err = resolve_group(&dom, control_of(&dom)).unwrap_err();
    assert_eq!(err, GroupError::NoGroupRoot);
}

#[test]
fn does_not_count_images_at_body_level() {
    let cells: String = grid_urls("777123", FULL_GRID)
        .iter()
        .map(|src| format!(r#"<img src="{src}"/>"#))
        .collect();
    let page =
        format!(r#"<html><body><button id="save">Save</button>{cells}</body></html>"#);
    let dom = PageDom::parse(&page);

    let err = resolve_group(&dom, control_of(&dom)).unwrap_err();
    assert_eq!(err, GroupError::NoGroupRoot);
}

#[test]
fn surfaces_style_code_extraction_failure() {
    let urls: Vec<String> = (0..FULL_GRID)
        .map(|i| format!("https://cdn.test/styles/x_777123/{i}_640_N.webp"))
        .collect();
    let dom = PageDom::parse(&grid_page(&urls));

    let err = resolve_group(&dom, control_of(&dom)).unwrap_err();
    assert!(matches!(err, GroupError::Sref(_)));
}
