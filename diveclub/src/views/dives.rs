use std::str::FromStr;

use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{PageResult, html, parse_id, render, render_invalid};
use crate::{
    AppState,
    entities::{dive, member},
    errors::ApiError,
    operations::{
        ListQuery,
        dives::{self, DivePayload},
        members,
    },
    validation::{ValidationErrors, validators},
};

/// Raw form fields; everything arrives as text and is parsed here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiveForm {
    pub member: String,
    pub location: String,
    pub date: String,
    pub depth: String,
    pub duration: String,
}

fn parse_field<T>(
    errors: &mut ValidationErrors,
    field: &str,
    raw: &str,
    invalid: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Option<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.push(field, validators::REQUIRED);
        return None;
    }
    let parsed = parse(raw);
    if parsed.is_none() {
        errors.push(field, invalid);
    }
    parsed
}

impl DiveForm {
    /// Parse the text fields. Conversion failures are reported per field
    /// together with the location checks, so the form shows every problem at
    /// once.
    ///
    /// # Errors
    ///
    /// Returns the collected field errors if any value cannot be parsed.
    pub fn into_payload(self) -> Result<DivePayload, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let member_id = parse_field(
            &mut errors,
            "member",
            &self.member,
            "Select a valid choice. That choice is not one of the available choices.",
            |raw| raw.parse::<i32>().ok(),
        );
        let date = parse_field(&mut errors, "date", &self.date, "Enter a valid date.", |raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
        });
        let depth = parse_field(&mut errors, "depth", &self.depth, "Enter a number.", |raw| {
            Decimal::from_str(raw).ok()
        });
        let duration = parse_field(&mut errors, "duration", &self.duration, "Enter a whole number.", |raw| {
            raw.parse::<i32>().ok()
        });

        match (member_id, date, depth, duration) {
            (Some(member_id), Some(date), Some(depth), Some(duration)) => Ok(DivePayload {
                member_id,
                location: self.location,
                date,
                depth,
                duration,
            }),
            _ => {
                if let Err(error) = validators::validate_required("location", &self.location) {
                    errors.add(error);
                } else {
                    errors.check(validators::validate_max_length("location", self.location.trim(), 200));
                }
                Err(errors)
            }
        }
    }
}

impl From<&dive::Model> for DiveForm {
    fn from(model: &dive::Model) -> Self {
        Self {
            member: model.member_id.to_string(),
            location: model.location.clone(),
            date: model.date.to_string(),
            depth: model.depth.to_string(),
            duration: model.duration.to_string(),
        }
    }
}

fn detail_url(id: i32) -> String {
    format!("/dives/{id}/")
}

fn owner_link(owner: Option<&member::Model>) -> String {
    owner.map_or_else(
        || "-".to_string(),
        |member| html::anchor(&format!("/members/{}/", member.id), &member.full_name()),
    )
}

async fn form_page(
    state: &AppState,
    title: &str,
    action: &str,
    cancel: &str,
    form: &DiveForm,
    errors: &ValidationErrors,
) -> Result<String, ApiError> {
    let mut options = vec![(String::new(), "---------".to_string())];
    options.extend(
        members::choices(&state.db)
            .await?
            .into_iter()
            .map(|member| (member.id.to_string(), member.to_string())),
    );

    let fields = vec![
        html::select("member", "Member", &options, form.member.trim(), errors),
        html::input("location", "Location", "text", &form.location, errors),
        html::input("date", "Date", "date", &form.date, errors),
        html::input("depth", "Depth (m)", "text", &form.depth, errors),
        html::input("duration", "Duration (min)", "number", &form.duration, errors),
    ];
    Ok(format!(
        "<h2>{}</h2>\n{}",
        html::escape(title),
        html::form(action, &fields, "Save", cancel)
    ))
}

pub async fn list(State(state): State<AppState>, Query(query): Query<ListQuery>) -> PageResult {
    let page = dives::list(&state.db, &query, state.per_page).await?;
    let q = query.q.as_deref().unwrap_or_default();

    let rows: Vec<Vec<String>> = page
        .items
        .iter()
        .map(|(dive, owner)| {
            vec![
                html::anchor(&detail_url(dive.id), &dive.location),
                dive.date.to_string(),
                owner_link(owner.as_ref()),
                dive.depth.to_string(),
                dive.duration.to_string(),
            ]
        })
        .collect();

    let body = format!(
        "{search}\n<p>{add}</p>\n{table}\n{nav}",
        search = html::search_form("/dives/", q, ""),
        add = html::anchor("/dives/create/", "Log a dive"),
        table = html::table(
            &["Location", "Date", "Member", "Depth (m)", "Duration (min)"],
            &rows,
            "No dives found."
        ),
        nav = html::pagination("/dives/", &page, &[("q", q)]),
    );
    Ok(render("Dives", &body))
}

pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> PageResult {
    let id = parse_id(&id, "Dive")?;
    let (dive, owner) = dives::detail(&state.db, id).await?;

    let body = format!(
        "{fields}\n<p>{edit} | {delete}</p>",
        fields = html::details(&[
            ("Member", owner_link(owner.as_ref())),
            ("Location", html::escape(&dive.location)),
            ("Date", dive.date.to_string()),
            ("Depth (m)", dive.depth.to_string()),
            ("Duration (min)", dive.duration.to_string()),
        ]),
        edit = html::anchor(&format!("/dives/{id}/update/"), "Edit"),
        delete = html::anchor(&format!("/dives/{id}/delete/"), "Delete"),
    );
    Ok(render(&dive.to_string(), &body))
}

pub async fn create_form(State(state): State<AppState>) -> PageResult {
    let body = form_page(
        &state,
        "New dive",
        "/dives/create/",
        "/dives/",
        &DiveForm::default(),
        &ValidationErrors::new(),
    )
    .await?;
    Ok(render("Dives", &body))
}

pub async fn create(State(state): State<AppState>, Form(form): Form<DiveForm>) -> PageResult {
    let outcome = match form.clone().into_payload() {
        Ok(payload) => dives::create(&state.db, payload).await,
        Err(errors) => Err(ApiError::from(errors)),
    };

    match outcome {
        Ok(dive) => Ok(Redirect::to(&detail_url(dive.id)).into_response()),
        Err(ApiError::ValidationFailed { errors }) => {
            let body = form_page(&state, "New dive", "/dives/create/", "/dives/", &form, &errors).await?;
            Ok(render_invalid("Dives", &body))
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn update_form(State(state): State<AppState>, Path(id): Path<String>) -> PageResult {
    let id = parse_id(&id, "Dive")?;
    let dive = dives::get(&state.db, id).await?;

    let body = form_page(
        &state,
        &format!("Edit {dive}"),
        &format!("/dives/{id}/update/"),
        &detail_url(id),
        &DiveForm::from(&dive),
        &ValidationErrors::new(),
    )
    .await?;
    Ok(render("Dives", &body))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<DiveForm>,
) -> PageResult {
    let id = parse_id(&id, "Dive")?;
    // Unknown ids are a 404 even when the submitted form is also invalid.
    dives::get(&state.db, id).await?;

    let outcome = match form.clone().into_payload() {
        Ok(payload) => dives::update(&state.db, id, payload).await,
        Err(errors) => Err(ApiError::from(errors)),
    };

    match outcome {
        Ok(dive) => Ok(Redirect::to(&detail_url(dive.id)).into_response()),
        Err(ApiError::ValidationFailed { errors }) => {
            let body = form_page(
                &state,
                "Edit dive",
                &format!("/dives/{id}/update/"),
                &detail_url(id),
                &form,
                &errors,
            )
            .await?;
            Ok(render_invalid("Dives", &body))
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn delete_confirm(State(state): State<AppState>, Path(id): Path<String>) -> PageResult {
    let id = parse_id(&id, "Dive")?;
    let dive = dives::get(&state.db, id).await?;

    let body = html::confirm_delete(
        &dive.to_string(),
        "",
        &format!("/dives/{id}/delete/"),
        &detail_url(id),
    );
    Ok(render("Delete dive", &body))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> PageResult {
    let id = parse_id(&id, "Dive")?;
    dives::delete(&state.db, id).await?;
    Ok(Redirect::to("/dives/").into_response())
}
