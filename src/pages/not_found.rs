use leptos::prelude::*;

/// 404 fallback for unknown routes.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<section class="panel">
			<h1>"Page not found"</h1>
			<p>
				"Nothing lives at this address. "
				<a href="/">"Back to the studio"</a>
			</p>
		</section>
	}
}
