use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};

use super::{PageResult, html, parse_id, render, render_invalid};
use crate::{
    AppState,
    errors::ApiError,
    operations::{
        ListQuery,
        members::{self, MemberPayload},
    },
    validation::ValidationErrors,
};

fn detail_url(id: i32) -> String {
    format!("/members/{id}/")
}

fn form_fields(payload: &MemberPayload, errors: &ValidationErrors) -> Vec<String> {
    vec![
        html::input("first_name", "First name", "text", &payload.first_name, errors),
        html::input("last_name", "Last name", "text", &payload.last_name, errors),
        html::input("email", "Email", "email", &payload.email, errors),
        html::input("certification", "Certification", "text", &payload.certification, errors),
    ]
}

fn form_page(title: &str, action: &str, cancel: &str, payload: &MemberPayload, errors: &ValidationErrors) -> String {
    format!(
        "<h2>{}</h2>\n{}",
        html::escape(title),
        html::form(action, &form_fields(payload, errors), "Save", cancel)
    )
}

pub async fn list(State(state): State<AppState>, Query(query): Query<ListQuery>) -> PageResult {
    let page = members::list(&state.db, &query, state.per_page).await?;
    let q = query.q.as_deref().unwrap_or_default();

    let rows: Vec<Vec<String>> = page
        .items
        .iter()
        .map(|member| {
            vec![
                html::anchor(&detail_url(member.id), &member.full_name()),
                html::escape(&member.email),
                html::escape(&member.certification),
                member.date_joined.to_string(),
            ]
        })
        .collect();

    let body = format!(
        "{search}\n<p>{add}</p>\n{table}\n{nav}",
        search = html::search_form("/members/", q, ""),
        add = html::anchor("/members/create/", "Add member"),
        table = html::table(
            &["Name", "Email", "Certification", "Joined"],
            &rows,
            "No members found."
        ),
        nav = html::pagination("/members/", &page, &[("q", q)]),
    );
    Ok(render("Members", &body))
}

pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> PageResult {
    let id = parse_id(&id, "Member")?;
    let members::MemberDetail {
        member,
        dives,
        equipment,
    } = members::detail(&state.db, id).await?;

    let dive_rows: Vec<Vec<String>> = dives
        .iter()
        .map(|dive| {
            vec![
                html::anchor(&format!("/dives/{}/", dive.id), &dive.location),
                dive.date.to_string(),
                dive.depth.to_string(),
                dive.duration.to_string(),
            ]
        })
        .collect();
    let equipment_rows: Vec<Vec<String>> = equipment
        .iter()
        .map(|item| {
            vec![
                html::anchor(&format!("/equipment/{}/", item.id), &item.name),
                item.equipment_type.label().to_string(),
                if item.is_functional { "Yes" } else { "No" }.to_string(),
            ]
        })
        .collect();

    let body = format!(
        "{fields}\n<p>{edit} | {delete}</p>\n<h2>Dives</h2>\n{dives}\n<h2>Equipment</h2>\n{equipment}",
        fields = html::details(&[
            ("Email", html::escape(&member.email)),
            ("Certification", html::escape(&member.certification)),
            ("Joined", member.date_joined.to_string()),
        ]),
        edit = html::anchor(&format!("/members/{id}/update/"), "Edit"),
        delete = html::anchor(&format!("/members/{id}/delete/"), "Delete"),
        dives = html::table(
            &["Location", "Date", "Depth (m)", "Duration (min)"],
            &dive_rows,
            "No dives logged."
        ),
        equipment = html::table(&["Name", "Type", "Functional"], &equipment_rows, "No equipment assigned."),
    );
    Ok(render(&member.full_name(), &body))
}

pub async fn create_form() -> Response {
    let body = form_page(
        "New member",
        "/members/create/",
        "/members/",
        &MemberPayload::default(),
        &ValidationErrors::new(),
    );
    render("Members", &body)
}

pub async fn create(State(state): State<AppState>, Form(payload): Form<MemberPayload>) -> PageResult {
    match members::create(&state.db, payload.clone()).await {
        Ok(member) => Ok(Redirect::to(&detail_url(member.id)).into_response()),
        Err(ApiError::ValidationFailed { errors }) => {
            let body = form_page("New member", "/members/create/", "/members/", &payload, &errors);
            Ok(render_invalid("Members", &body))
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn update_form(State(state): State<AppState>, Path(id): Path<String>) -> PageResult {
    let id = parse_id(&id, "Member")?;
    let member = members::get(&state.db, id).await?;

    let body = form_page(
        &format!("Edit {member}"),
        &format!("/members/{id}/update/"),
        &detail_url(id),
        &MemberPayload::from(&member),
        &ValidationErrors::new(),
    );
    Ok(render("Members", &body))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(payload): Form<MemberPayload>,
) -> PageResult {
    let id = parse_id(&id, "Member")?;
    match members::update(&state.db, id, payload.clone()).await {
        Ok(member) => Ok(Redirect::to(&detail_url(member.id)).into_response()),
        Err(ApiError::ValidationFailed { errors }) => {
            let body = form_page(
                "Edit member",
                &format!("/members/{id}/update/"),
                &detail_url(id),
                &payload,
                &errors,
            );
            Ok(render_invalid("Members", &body))
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn delete_confirm(State(state): State<AppState>, Path(id): Path<String>) -> PageResult {
    let id = parse_id(&id, "Member")?;
    let detail = members::detail(&state.db, id).await?;

    let warning = format!(
        "This also deletes {} dive(s). {} equipment item(s) will be left without an owner.",
        detail.dives.len(),
        detail.equipment.len()
    );
    let body = html::confirm_delete(
        &detail.member.to_string(),
        &warning,
        &format!("/members/{id}/delete/"),
        &detail_url(id),
    );
    Ok(render("Delete member", &body))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> PageResult {
    let id = parse_id(&id, "Member")?;
    members::delete(&state.db, id).await?;
    Ok(Redirect::to("/members/").into_response())
}
