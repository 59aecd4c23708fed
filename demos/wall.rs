//! Minimal card wall against the in-memory canvas backend.
//!
//! Run with: cargo run --example wall

use std::cell::RefCell;
use std::rc::Rc;

use spark_canvas::catalog::Catalog;
use spark_canvas::engine::{CanvasEngine, EntityKind, MemoryCanvas};
use spark_canvas::pipeline::{self, mount};
use spark_canvas::state::{filter, pager};

const CARDS: &str = r#"[
    {"id": "sunrise",  "title": "Sunrise Study",  "collection": "paintings", "tags": ["oil", "morning"], "date": "2021-04-02",
     "summary": "Quick oil sketch chasing the first light over the bay."},
    {"id": "harbor",   "title": "Harbor Fog",     "collection": "paintings", "tags": ["oil"],
     "summary": "Grey-on-grey tonal exercise."},
    {"id": "parser",   "title": "Tiny Parser",    "collection": "projects",  "tags": ["rust"], "date": "2022-09-18",
     "summary": "Recursive descent over a weekend."},
    {"id": "plotter",  "title": "Pen Plotter",    "collection": "projects",  "tags": ["hardware", "ink"],
     "summary": "G-code from SVG, badly at first."},
    {"id": "woodcut",  "title": "Woodcut Print",  "collection": "prints",    "tags": ["ink", "morning"],
     "summary": "Three-layer reduction cut."}
]"#;

fn main() {
    let catalog = Rc::new(Catalog::from_json_str(CARDS).expect("demo catalog parses"));

    let mut canvas = MemoryCanvas::new();
    canvas.set_ready(true);
    let concrete = Rc::new(RefCell::new(canvas));
    let engine: Rc<RefCell<dyn CanvasEngine>> = concrete.clone();

    let handle = mount(engine.clone(), catalog, None);

    println!(
        "mounted: {} visible, page {}/{}",
        pipeline::visible_count(),
        pipeline::current_page(),
        pipeline::page_count()
    );
    print_wall(&engine);

    println!("\n-- toggle 'paintings' off --");
    filter::toggle_collection("paintings", false);
    println!(
        "now {} visible on page {}/{}",
        pipeline::visible_count(),
        pipeline::current_page(),
        pipeline::page_count()
    );
    print_wall(&engine);

    println!("\n-- page size 2, page 2 --");
    filter::toggle_collection("paintings", true);
    pager::set_page_size(2);
    pager::set_page(2);
    print_wall(&engine);

    handle.unmount();
}

fn print_wall(engine: &Rc<RefCell<dyn CanvasEngine>>) {
    for entity in engine.borrow().entities_of(EntityKind::Card) {
        if let Some(card) = entity.as_card() {
            println!(
                "  [{:>8}] {:<16} at ({:>5.0}, {:>5.0})",
                card.card_id, card.display.title, card.position.x, card.position.y
            );
        }
    }
}
