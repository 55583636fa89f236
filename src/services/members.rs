use crate::{
    error::{AppError, AppResult},
    models::MemberInterests,
    services::{catalog::Lookups, list_field::LIST_DELIMITERS},
};

/// Trims the submitted interests and drops blanks and case-insensitive repeats.
///
/// A name containing a list delimiter is rejected, since it could not be read
/// back as a single interest.
pub fn clean_interests(submitted: &[String]) -> AppResult<Vec<String>> {
    let mut cleaned: Vec<String> = Vec::new();
    for name in submitted {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        if name.contains(LIST_DELIMITERS) || name.starts_with('[') {
            return Err(AppError::InvalidInput(format!(
                "Interest '{}' cannot be stored as a single list entry",
                name
            )));
        }
        if !cleaned.iter().any(|c| c.to_lowercase() == name.to_lowercase()) {
            cleaned.push(name.to_string());
        }
    }
    Ok(cleaned)
}

pub async fn get_interests(lookups: &Lookups, member: &str) -> AppResult<MemberInterests> {
    let interests = lookups.members.get_member_interests(member).await?;
    Ok(interests.into())
}

/// Replaces a member's declared interests and returns them as stored
pub async fn update_interests(
    lookups: &Lookups,
    member: &str,
    submitted: &[String],
) -> AppResult<MemberInterests> {
    let interests = clean_interests(submitted)?;
    lookups
        .members
        .set_member_interests(member, &interests)
        .await?;

    tracing::info!(member = %member, count = interests.len(), "Member interests updated");

    get_interests(lookups, member).await
}
