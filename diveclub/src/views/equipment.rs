use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;

use super::{PageResult, html, parse_id, render, render_invalid};
use crate::{
    AppState,
    entities::{EquipmentType, equipment, member},
    errors::ApiError,
    operations::{
        ListQuery,
        equipment::{self as items, EquipmentPayload},
        members,
    },
    validation::{ValidationErrors, validators},
};

const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

/// Raw form fields. An unchecked checkbox is simply absent from the body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EquipmentForm {
    pub name: String,
    pub equipment_type: String,
    pub is_functional: Option<String>,
    pub member: String,
}

impl EquipmentForm {
    fn blank() -> Self {
        Self {
            is_functional: Some("on".to_string()),
            ..Self::default()
        }
    }

    /// # Errors
    ///
    /// Returns field errors for a missing or unknown type, an unparsable
    /// member, or an invalid name.
    pub fn into_payload(self) -> Result<EquipmentPayload, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let kind = self.equipment_type.trim();
        let equipment_type = if kind.is_empty() {
            errors.push("equipment_type", validators::REQUIRED);
            None
        } else {
            kind.parse::<EquipmentType>()
                .map_err(|_| {
                    errors.push(
                        "equipment_type",
                        format!("Select a valid choice. {kind} is not one of the available choices."),
                    );
                })
                .ok()
        };

        let member = self.member.trim();
        let member_id = if member.is_empty() {
            Ok(None)
        } else {
            member.parse::<i32>().map(Some).map_err(|_| {
                errors.push("member", INVALID_CHOICE);
            })
        };

        match (equipment_type, member_id) {
            (Some(equipment_type), Ok(member_id)) => Ok(EquipmentPayload {
                name: self.name,
                equipment_type,
                is_functional: self.is_functional.is_some(),
                member_id,
            }),
            _ => {
                if let Err(error) = validators::validate_required("name", &self.name) {
                    errors.add(error);
                } else {
                    errors.check(validators::validate_max_length("name", self.name.trim(), 100));
                }
                Err(errors)
            }
        }
    }
}

impl From<&equipment::Model> for EquipmentForm {
    fn from(model: &equipment::Model) -> Self {
        Self {
            name: model.name.clone(),
            equipment_type: model.equipment_type.as_str().to_string(),
            is_functional: model.is_functional.then(|| "on".to_string()),
            member: model.member_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }
}

fn detail_url(id: i32) -> String {
    format!("/equipment/{id}/")
}

fn owner_link(owner: Option<&member::Model>) -> String {
    owner.map_or_else(
        || "-".to_string(),
        |member| html::anchor(&format!("/members/{}/", member.id), &member.full_name()),
    )
}

fn type_options(blank: &str) -> Vec<(String, String)> {
    std::iter::once((String::new(), blank.to_string()))
        .chain(
            EquipmentType::ALL
                .into_iter()
                .map(|kind| (kind.as_str().to_string(), kind.label().to_string())),
        )
        .collect()
}

async fn form_page(
    state: &AppState,
    title: &str,
    action: &str,
    cancel: &str,
    form: &EquipmentForm,
    errors: &ValidationErrors,
) -> Result<String, ApiError> {
    let mut owners = vec![(String::new(), "---------".to_string())];
    owners.extend(
        members::choices(&state.db)
            .await?
            .into_iter()
            .map(|member| (member.id.to_string(), member.to_string())),
    );

    let fields = vec![
        html::input("name", "Name", "text", &form.name, errors),
        html::select(
            "equipment_type",
            "Type",
            &type_options("---------"),
            form.equipment_type.trim(),
            errors,
        ),
        html::checkbox("is_functional", "Functional", form.is_functional.is_some(), errors),
        html::select("member", "Member", &owners, form.member.trim(), errors),
    ];
    Ok(format!(
        "<h2>{}</h2>\n{}",
        html::escape(title),
        html::form(action, &fields, "Save", cancel)
    ))
}

pub async fn list(State(state): State<AppState>, Query(query): Query<ListQuery>) -> PageResult {
    let page = items::list(&state.db, &query, state.per_page).await?;
    let q = query.q.as_deref().unwrap_or_default();
    let kind = query.equipment_type.as_deref().unwrap_or_default();

    let rows: Vec<Vec<String>> = page
        .items
        .iter()
        .map(|(item, owner)| {
            vec![
                html::anchor(&detail_url(item.id), &item.name),
                item.equipment_type.label().to_string(),
                if item.is_functional { "Yes" } else { "No" }.to_string(),
                owner_link(owner.as_ref()),
            ]
        })
        .collect();

    let type_filter = html::select("type", "Type", &type_options("All"), kind, &ValidationErrors::new());
    let body = format!(
        "{search}\n<p>{add}</p>\n{table}\n{nav}",
        search = html::search_form("/equipment/", q, &type_filter),
        add = html::anchor("/equipment/create/", "Add equipment"),
        table = html::table(
            &["Name", "Type", "Functional", "Member"],
            &rows,
            "No equipment found."
        ),
        nav = html::pagination("/equipment/", &page, &[("q", q), ("type", kind)]),
    );
    Ok(render("Equipment", &body))
}

pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> PageResult {
    let id = parse_id(&id, "Equipment")?;
    let (item, owner) = items::detail(&state.db, id).await?;

    let body = format!(
        "{fields}\n<p>{edit} | {delete}</p>",
        fields = html::details(&[
            ("Type", item.equipment_type.label().to_string()),
            ("Functional", if item.is_functional { "Yes" } else { "No" }.to_string()),
            ("Member", owner_link(owner.as_ref())),
        ]),
        edit = html::anchor(&format!("/equipment/{id}/update/"), "Edit"),
        delete = html::anchor(&format!("/equipment/{id}/delete/"), "Delete"),
    );
    Ok(render(&item.name, &body))
}

pub async fn create_form(State(state): State<AppState>) -> PageResult {
    let body = form_page(
        &state,
        "New equipment",
        "/equipment/create/",
        "/equipment/",
        &EquipmentForm::blank(),
        &ValidationErrors::new(),
    )
    .await?;
    Ok(render("Equipment", &body))
}

pub async fn create(State(state): State<AppState>, Form(form): Form<EquipmentForm>) -> PageResult {
    let outcome = match form.clone().into_payload() {
        Ok(payload) => items::create(&state.db, payload).await,
        Err(errors) => Err(ApiError::from(errors)),
    };

    match outcome {
        Ok(item) => Ok(Redirect::to(&detail_url(item.id)).into_response()),
        Err(ApiError::ValidationFailed { errors }) => {
            let body = form_page(
                &state,
                "New equipment",
                "/equipment/create/",
                "/equipment/",
                &form,
                &errors,
            )
            .await?;
            Ok(render_invalid("Equipment", &body))
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn update_form(State(state): State<AppState>, Path(id): Path<String>) -> PageResult {
    let id = parse_id(&id, "Equipment")?;
    let item = items::get(&state.db, id).await?;

    let body = form_page(
        &state,
        &format!("Edit {item}"),
        &format!("/equipment/{id}/update/"),
        &detail_url(id),
        &EquipmentForm::from(&item),
        &ValidationErrors::new(),
    )
    .await?;
    Ok(render("Equipment", &body))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<EquipmentForm>,
) -> PageResult {
    let id = parse_id(&id, "Equipment")?;
    items::get(&state.db, id).await?;

    let outcome = match form.clone().into_payload() {
        Ok(payload) => items::update(&state.db, id, payload).await,
        Err(errors) => Err(ApiError::from(errors)),
    };

    match outcome {
        Ok(item) => Ok(Redirect::to(&detail_url(item.id)).into_response()),
        Err(ApiError::ValidationFailed { errors }) => {
            let body = form_page(
                &state,
                "Edit equipment",
                &format!("/equipment/{id}/update/"),
                &detail_url(id),
                &form,
                &errors,
            )
            .await?;
            Ok(render_invalid("Equipment", &body))
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn delete_confirm(State(state): State<AppState>, Path(id): Path<String>) -> PageResult {
    let id = parse_id(&id, "Equipment")?;
    let item = items::get(&state.db, id).await?;

    let body = html::confirm_delete(
        &item.to_string(),
        "",
        &format!("/equipment/{id}/delete/"),
        &detail_url(id),
    );
    Ok(render("Delete equipment", &body))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> PageResult {
    let id = parse_id(&id, "Equipment")?;
    items::delete(&state.db, id).await?;
    Ok(Redirect::to("/equipment/").into_response())
}
