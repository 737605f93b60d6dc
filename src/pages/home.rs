use leptos::prelude::*;

use crate::components::kg_preview::KgPreviewPanel;
use crate::components::pipeline::PipelinePanel;

/// Default Home Page: pipeline controls above the graph preview.
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<div class="home">
				<header class="home-header">
					<h1>"Knowledge Graph Studio"</h1>
					<p class="subtitle">
						"Turn documents into a knowledge graph, then generate questions from it."
					</p>
				</header>
				<PipelinePanel />
				<KgPreviewPanel />
			</div>
		</ErrorBoundary>
	}
}
