use axum::response::Response;

use super::render;

/// Static dashboard linking to the three record lists.
pub async fn home() -> Response {
    render(
        "Ronilački klub",
        r#"<ul>
<li><a href="/members/">Members</a>: club participants and their certifications</li>
<li><a href="/dives/">Dives</a>: logged dives with location, depth and duration</li>
<li><a href="/equipment/">Equipment</a>: tanks, fins, suits and masks, and who has them</li>
</ul>
<p><a href="/admin/">Administration</a></p>"#,
    )
}
