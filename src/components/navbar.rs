use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn Navbar() -> impl IntoView {
	view! {
		<nav class="navbar">
			<span class="navbar-brand">"Knowledge Graph Studio"</span>
			<div class="navbar-links">
				<A href="/">"Home"</A>
				<A href="/api-config">"API Config"</A>
				<A href="/contact">"Contact"</A>
			</div>
		</nav>
	}
}
