//! Expense Manager Web Client
//!
//! Browser front end for the expenses services.
//!
//! # Key Features
//! - **One shared connection**: `ApiProvider` owns the transport; every view
//!   talks through it
//! - **Typed fetches**: `use_request::<T>()` pairs each view with one
//!   service operation
//! - **Observable fetch state**: loading, resolved and failed states each
//!   render

mod app;
mod pages;

fn main() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);

    leptos::mount::mount_to_body(|| leptos::view! { <app::App/> });
}
