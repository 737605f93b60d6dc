use leptos::prelude::*;

use crate::errors::DisplayError;

/// Notification card for a failed pipeline run: template title, message,
/// remediation steps and the raw details on demand.
#[component]
pub fn ErrorNotice(error: RwSignal<Option<DisplayError>>) -> impl IntoView {
	view! {
		{move || {
			error.get().map(|err| {
				let solutions = err.solutions.clone();
				let details = err.details.clone();
				view! {
					<div class=format!("error-notice error-{}", err.kind)>
						<div class="error-notice-header">
							<h3>{err.title.clone()}</h3>
							<button type="button" on:click=move |_| error.set(None)>
								"x"
							</button>
						</div>
						<p>{err.description.clone()}</p>
						{(!solutions.is_empty())
							.then(|| {
								view! {
									<div class="error-solutions">
										<p>"Suggested fixes:"</p>
										<ul>
											{solutions
												.into_iter()
												.map(|s| view! { <li>{s}</li> })
												.collect_view()}
										</ul>
									</div>
								}
							})}
						{details
							.map(|d| {
								view! {
									<details class="error-details">
										<summary>"Show raw error"</summary>
										<pre>{d}</pre>
									</details>
								}
							})}
					</div>
				}
			})
		}}
	}
}
