//! Leptos client-side app wiring and routes.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
pub mod components;
pub mod errors;
pub mod estimate;
pub mod pages;
pub mod rpc;
pub mod storage;
pub mod store;

use crate::components::navbar::Navbar;
use crate::pages::api_config::ApiConfigPage;
use crate::pages::contact::Contact;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;
use crate::store::provide_app_store;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the studio pages and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	provide_app_store();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Knowledge Graph Studio" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Navbar />
			<main>
				<Routes fallback=|| view! { <NotFound /> }>
					<Route path=path!("/") view=Home />
					<Route path=path!("/api-config") view=ApiConfigPage />
					<Route path=path!("/contact") view=Contact />
				</Routes>
			</main>
		</Router>
	}
}
