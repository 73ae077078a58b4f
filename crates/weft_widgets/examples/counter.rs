//! Counter Demo
//!
//! A small app exercising the main widget factories: a state-driven
//! counter, a greeting input, a stacked promo badge, and a draggable
//! fruit list. Interactions are simulated through the event dispatcher
//! and the tree is dumped after each step.
//!
//! Run with:
//! `cargo run -p weft_widgets --example counter`

use weft_widgets::prelude::*;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let ctx = WidgetContext::new();

    // Counter region: only the label rebuilds when the count changes.
    let count = State::new(0i32);
    let c = count.clone();
    let counter_label = text(
        &ctx,
        Content::dynamic(move || format!("Current value: {}", c.get())),
        Config::new().class("text-2xl font-semibold"),
    );
    count.bind(&counter_label);

    let c = count.clone();
    let increment = button(
        &ctx,
        "Increment",
        Config::new().on_click(move |_| c.update(|n| *n += 1)),
    );
    let c = count.clone();
    let decrement = button(
        &ctx,
        "Decrement",
        Config::new()
            .class("bg-gray-500 hover:bg-gray-600")
            .on_click(move |_| c.update(|n| *n -= 1)),
    );
    let controls = row(
        &ctx,
        vec![increment.node(), decrement.node()],
        Config::new().class("gap-2"),
    );

    // Greeting region driven by an input field.
    let name = State::new(String::new());
    let n = name.clone();
    let greeting = text(
        &ctx,
        Content::dynamic(move || {
            let n = n.get();
            if n.is_empty() {
                "Hello, stranger!".to_string()
            } else {
                format!("Hello, {n}!")
            }
        }),
        Config::new(),
    );
    name.bind(&greeting);
    let n = name.clone();
    let name_field = input(
        &ctx,
        Config::new()
            .placeholder("Type your name...")
            .on_input(move |value, _| n.set(value.to_string())),
    );

    // Layered banner with an absolutely positioned badge.
    let banner = image(&ctx, "banner.jpg", Config::new());
    let badge = positioned(
        &ctx,
        text(&ctx, "Promo!", Config::new().class("text-white font-bold")).node(),
        Config::new().class("bottom-2 left-2 bg-red-600 px-2 rounded"),
    );
    let hero = stack(
        &ctx,
        vec![banner.node(), badge.node()],
        Config::new().class("w-72"),
    );

    // Draggable fruit list.
    let fruits = vec![
        "Apple".to_string(),
        "Banana".to_string(),
        "Cherry".to_string(),
        "Date".to_string(),
    ];
    let list_ctx = ctx.clone();
    let (fruit_list, drag) = drag_list(
        &ctx,
        fruits,
        move |fruit, _| text(&list_ctx, fruit, Config::new()).node(),
        Config::new()
            .chosen_class("bg-yellow-100 ring-2")
            .ghost_class("opacity-40")
            .reorder_backend(std::rc::Rc::new(InProcessBackend)),
    );
    ctx.run_deferred();

    let app = column(
        &ctx,
        vec![
            text(&ctx, "Mini counter", Config::new().class("text-3xl")).node(),
            spacer(&ctx, "4", Config::new()).node(),
            counter_label.node(),
            controls.node(),
            spacer(&ctx, "4", Config::new()).node(),
            greeting.node(),
            name_field.node(),
            spacer(&ctx, "4", Config::new()).node(),
            hero.node(),
            fruit_list.node(),
        ],
        Config::new().id("app").class("p-6 gap-1"),
    );

    println!("--- initial ---\n{}", ctx.tree().debug_string(app.node()));

    ctx.emit_click(increment.node());
    ctx.emit_click(increment.node());
    ctx.emit_click(decrement.node());
    ctx.emit_input(name_field.node(), "Ada");
    println!(
        "--- after two increments, one decrement, typing \"Ada\" ---\n{}",
        ctx.tree().debug_string(app.node())
    );

    // Drag "Apple" below "Cherry".
    drag.choose(0);
    drag.start_drag();
    drag.end_drag(2);
    println!(
        "--- after dragging the first fruit to index 2 ---\n{}",
        ctx.tree().debug_string(fruit_list.node())
    );
}
