//! Form validation. Each `clean_*` either yields values ready to store or the
//! full set of field errors; nothing is persisted on failure.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;

use classifieds_db::models::{AdWrite, Picture};
use classifieds_types::api::AdForm;
use classifieds_types::catalog::{BreedForm, CatForm};

use crate::error::FieldErrors;

/// 2 MB upload limit for ad pictures
pub const MAX_PICTURE_BYTES: usize = 2 * 1024 * 1024;

const REQUIRED: &str = "This field is required.";
const MAX_TAG_CHARS: usize = 100;
const MAX_CONTENT_TYPE_CHARS: usize = 256;
/// Prices have at most 7 digits, 2 of them after the point.
const PRICE_WHOLE_DIGITS: usize = 5;

/// A validated ad form. The responsible user is still a username; the
/// handler resolves it against the store.
#[derive(Debug)]
pub struct CleanAd {
    pub title: String,
    pub price_cents: Option<i64>,
    pub text: String,
    pub tags: Vec<String>,
    pub responsible: Option<String>,
    pub picture: Option<Picture>,
}

impl CleanAd {
    pub fn into_write(self, responsible_id: String) -> AdWrite {
        AdWrite {
            title: self.title,
            price_cents: self.price_cents,
            text: self.text,
            responsible_id,
            tags: self.tags,
            picture: self.picture,
        }
    }
}

pub fn clean_ad(form: AdForm) -> Result<CleanAd, FieldErrors> {
    let mut errors = FieldErrors::default();

    let title = form.title.trim().to_string();
    check_length(&mut errors, "title", &title, 2, 200, "Title must be greater than 2 characters");

    let price_cents = match form.price.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match parse_price(raw) {
            Ok(cents) => Some(cents),
            Err(message) => {
                errors.add("price", message);
                None
            }
        },
    };

    let text = form.text.trim().to_string();
    if text.is_empty() {
        errors.add("text", REQUIRED);
    }

    let mut tags: Vec<String> = Vec::new();
    for tag in form.tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        if tag.chars().count() > MAX_TAG_CHARS {
            errors.add("tags", format!("Tags must be at most {MAX_TAG_CHARS} characters"));
        } else if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }

    let responsible = form
        .responsible
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    let picture = match form.picture.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(encoded) => clean_picture(&mut errors, encoded, form.content_type.as_deref()),
    };

    if errors.is_empty() {
        Ok(CleanAd {
            title,
            price_cents,
            text,
            tags,
            responsible,
            picture,
        })
    } else {
        Err(errors)
    }
}

fn clean_picture(errors: &mut FieldErrors, encoded: &str, content_type: Option<&str>) -> Option<Picture> {
    // Checked before decoding so oversized uploads are never held in memory twice.
    if encoded.len() / 4 * 3 > MAX_PICTURE_BYTES + 2 {
        errors.add("picture", picture_too_large());
        return None;
    }

    let bytes = match B64.decode(encoded) {
        Ok(bytes) => bytes,
        Err(_) => {
            errors.add("picture", "Picture must be base64-encoded");
            return None;
        }
    };
    if bytes.len() > MAX_PICTURE_BYTES {
        errors.add("picture", picture_too_large());
        return None;
    }

    let content_type = content_type.map(str::trim).unwrap_or_default();
    if content_type.is_empty() {
        errors.add("content_type", REQUIRED);
        return None;
    }
    if content_type.len() > MAX_CONTENT_TYPE_CHARS
        || !content_type.chars().all(|c| c.is_ascii_graphic() || c == ' ')
    {
        errors.add("content_type", "Enter a valid content type.");
        return None;
    }

    Some(Picture {
        bytes,
        content_type: content_type.to_string(),
    })
}

fn picture_too_large() -> String {
    format!("File must be < {:.1} MB", MAX_PICTURE_BYTES as f64 / (1024.0 * 1024.0))
}

/// Returns the trimmed comment text.
pub fn clean_comment(raw: &str) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::default();
    let text = raw.trim().to_string();
    check_length(&mut errors, "comment", &text, 3, 500, "Comment must be greater than 2 characters");
    if errors.is_empty() { Ok(text) } else { Err(errors) }
}

/// Returns the trimmed breed name.
pub fn clean_breed(form: BreedForm) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::default();
    let name = form.name.trim().to_string();
    check_length(&mut errors, "name", &name, 2, 200, "Breed must be greater than 1 character");
    if errors.is_empty() { Ok(name) } else { Err(errors) }
}

#[derive(Debug)]
pub struct CleanCat {
    pub nickname: String,
    pub foods: String,
    pub weight: String,
    pub breed_id: String,
}

/// Validates field shapes only; whether the breed exists is up to the caller.
pub fn clean_cat(form: CatForm) -> Result<CleanCat, FieldErrors> {
    let mut errors = FieldErrors::default();

    let nickname = form.nickname.trim().to_string();
    check_length(&mut errors, "nickname", &nickname, 2, 200, "Nickname must be greater than 1 character");

    let foods = form.foods.trim().to_string();
    check_length(&mut errors, "foods", &foods, 1, 300, REQUIRED);
    let weight = form.weight.trim().to_string();
    check_length(&mut errors, "weight", &weight, 1, 300, REQUIRED);

    if form.breed.is_none() {
        errors.add("breed", REQUIRED);
    }

    match form.breed {
        Some(breed) if errors.is_empty() => Ok(CleanCat {
            nickname,
            foods,
            weight,
            breed_id: breed.to_string(),
        }),
        _ => Err(errors),
    }
}

fn check_length(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
    too_short: &str,
) {
    let len = value.chars().count();
    if len == 0 {
        errors.add(field, REQUIRED);
    } else if len < min {
        errors.add(field, too_short);
    } else if len > max {
        errors.add(
            field,
            format!("Ensure this value has at most {max} characters (it has {len})."),
        );
    }
}

/// Parses a non-negative decimal with at most 2 decimal places into cents.
pub fn parse_price(raw: &str) -> Result<i64, &'static str> {
    if raw.starts_with('-') {
        return Err("Ensure this value is greater than or equal to 0.");
    }

    let (whole, frac) = raw.split_once('.').unwrap_or((raw, ""));
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
        return Err("Enter a number.");
    }
    if frac.len() > 2 {
        return Err("Ensure that there are no more than 2 decimal places.");
    }

    let whole = whole.trim_start_matches('0');
    if whole.len() > PRICE_WHOLE_DIGITS {
        return Err("Ensure that there are no more than 5 digits before the decimal point.");
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| "Enter a number.")? };
    let frac: i64 = format!("{frac:0<2}").parse().map_err(|_| "Enter a number.")?;
    Ok(whole * 100 + frac)
}

pub fn format_price(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn form(title: &str, text: &str) -> AdForm {
        AdForm {
            title: title.into(),
            text: text.into(),
            ..AdForm::default()
        }
    }

    #[test]
    fn prices() {
        assert_eq!(parse_price("12"), Ok(1200));
        assert_eq!(parse_price("12.5"), Ok(1250));
        assert_eq!(parse_price("0.05"), Ok(5));
        assert_eq!(parse_price(".5"), Ok(50));
        assert_eq!(parse_price("99999.99"), Ok(9_999_999));
        assert_eq!(parse_price("007.00"), Ok(700));
        assert!(parse_price("100000").is_err());
        assert!(parse_price("1.234").is_err());
        assert!(parse_price("-1").is_err());
        assert!(parse_price("abc").is_err());
        assert!(parse_price(".").is_err());
        assert_eq!(format_price(1250), "12.50");
        assert_eq!(format_price(5), "0.05");
    }

    #[test]
    fn ad_form_collects_every_error() {
        let mut bad = form("x", "  ");
        bad.price = Some("1.234".into());
        bad.picture = Some("!!!".into());

        let errors = clean_ad(bad).unwrap_err();
        assert_eq!(
            errors.get("title"),
            Some(&["Title must be greater than 2 characters".to_string()][..])
        );
        assert!(errors.get("text").is_some());
        assert!(errors.get("price").is_some());
        assert!(errors.get("picture").is_some());
    }

    #[test]
    fn ad_form_normalizes_tags_and_blank_price() {
        let mut ok = form(" Red Car ", "runs well");
        ok.price = Some("  ".into());
        ok.tags = vec!["car".into(), " car ".into(), "".into(), "red".into()];

        let clean = clean_ad(ok).unwrap();
        assert_eq!(clean.title, "Red Car");
        assert_eq!(clean.price_cents, None);
        assert_eq!(clean.tags, vec!["car", "red"]);
        assert!(clean.picture.is_none());
    }

    #[test]
    fn picture_needs_content_type_and_size_limit() {
        let mut with_picture = form("Red Car", "runs well");
        with_picture.picture = Some(B64.encode([1u8, 2, 3]));
        let errors = clean_ad(with_picture.clone()).unwrap_err();
        assert!(errors.get("content_type").is_some());

        with_picture.content_type = Some("image/png".into());
        let clean = clean_ad(with_picture).unwrap();
        assert_eq!(clean.picture.unwrap().bytes, vec![1, 2, 3]);

        let mut too_big = form("Red Car", "runs well");
        too_big.picture = Some(B64.encode(vec![0u8; MAX_PICTURE_BYTES + 1]));
        too_big.content_type = Some("image/png".into());
        let errors = clean_ad(too_big).unwrap_err();
        assert_eq!(errors.get("picture"), Some(&["File must be < 2.0 MB".to_string()][..]));
    }

    #[test]
    fn comment_length() {
        assert!(clean_comment("ok").is_err());
        assert!(clean_comment(&"x".repeat(501)).is_err());
        assert_eq!(clean_comment(" Nice! ").unwrap(), "Nice!");
    }

    #[test]
    fn cat_form() {
        let errors = clean_cat(CatForm {
            nickname: "F".into(),
            ..CatForm::default()
        })
        .unwrap_err();
        assert_eq!(
            errors.get("nickname"),
            Some(&["Nickname must be greater than 1 character".to_string()][..])
        );
        assert!(errors.get("breed").is_some());

        let breed = Uuid::new_v4();
        let cat = clean_cat(CatForm {
            nickname: "Fluffy".into(),
            foods: "fish".into(),
            weight: "4kg".into(),
            breed: Some(breed),
        })
        .unwrap();
        assert_eq!(cat.breed_id, breed.to_string());

        assert!(clean_breed(BreedForm { name: "S".into() }).is_err());
        assert_eq!(clean_breed(BreedForm { name: "Siberian".into() }).unwrap(), "Siberian");
    }
}
