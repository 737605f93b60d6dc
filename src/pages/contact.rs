use leptos::prelude::*;

#[component]
pub fn Contact() -> impl IntoView {
	view! {
		<section class="panel">
			<h1>"Contact"</h1>
			<p>
				"Questions, bug reports and feature requests are welcome on the project "
				"issue tracker."
			</p>
			<p class="contact-hint">
				"For pipeline failures, attach the raw error details from the notification."
			</p>
		</section>
	}
}
