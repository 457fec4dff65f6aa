use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

fn record(value: Value) -> Map<String, Value> {
	match value {
		Value::Object(map) => map,
		other => panic!("not an object: {other}"),
	}
}

fn teriyaki() -> Value {
	json!({
		"idMeal": "52772",
		"strMeal": "Teriyaki Chicken Casserole",
		"strCategory": "Chicken",
		"strArea": "Japanese",
		"strInstructions": "Preheat oven to 350.",
		"strMealThumb": "https://www.themealdb.com/images/media/meals/wvpsxx1468256321.jpg",
		"strTags": "Meat,Casserole",
		"strYoutube": "https://www.youtube.com/watch?v=4aZr5hZXP_s",
		"strSource": "",
		"strIngredient1": "soy sauce",
		"strMeasure1": "3/4 cup",
		"strIngredient2": " water ",
		"strMeasure2": " 1/2 cup ",
		"strIngredient3": "",
		"strMeasure3": "",
		"strIngredient4": "brown sugar",
		"strMeasure4": "  ",
		"strIngredient5": null,
		"strMeasure5": null,
		"strIngredient20": "sesame seeds",
		"strMeasure20": null
	})
}

#[test]
fn projects_core_fields() {
	let draft = project(&record(teriyaki())).unwrap();

	assert_eq!(draft.external_id, "52772");
	assert_eq!(draft.name, "Teriyaki Chicken Casserole");
	assert_eq!(draft.category.as_deref(), Some("Chicken"));
	assert_eq!(draft.country.as_deref(), Some("Japanese"));
	assert_eq!(draft.tags.as_deref(), Some("Meat,Casserole"));
	assert_eq!(draft.tutorial_link.as_deref(), Some("https://www.youtube.com/watch?v=4aZr5hZXP_s"));
	assert_eq!(draft.source_link, None);
}

#[test]
fn collects_numbered_ingredient_pairs() {
	let draft = project(&record(teriyaki())).unwrap();

	assert_eq!(
		draft.ingredients,
		vec![
			Ingredient::new("soy sauce", Some("3/4 cup".into())),
			Ingredient::new("water", Some("1/2 cup".into())),
			Ingredient::new("brown sugar", None),
			Ingredient::new("sesame seeds", None),
		]
	);
}

#[test]
fn ignores_slots_beyond_twenty() {
	let draft = project(&record(json!({
		"idMeal": "1",
		"strMeal": "Long",
		"strIngredient21": "extra",
		"strMeasure21": "1"
	})))
	.unwrap();
	assert!(draft.ingredients.is_empty());
}

#[test]
fn records_without_id_or_name_are_rejected() {
	let missing_name = project(&record(json!({ "idMeal": "1", "strMeal": "   " })));
	assert!(matches!(missing_name, Err(DecodeError::MissingField("strMeal"))));

	let missing_id = project(&record(json!({ "strMeal": "Soup" })));
	assert!(matches!(missing_id, Err(DecodeError::MissingField("idMeal"))));
}

#[test]
fn null_listing_means_no_results() {
	let response = MealsResponse::parse(r#"{ "meals": null }"#).unwrap();
	assert!(response.into_drafts().is_empty());
}

#[test]
fn bad_records_do_not_sink_the_listing() {
	let body = json!({ "meals": [teriyaki(), { "idMeal": "2" }, { "idMeal": "3", "strMeal": "Soup" }] });
	let drafts = MealsResponse::parse(&body.to_string()).unwrap().into_drafts();

	let ids: Vec<_> = drafts.iter().map(|d| d.external_id.as_str()).collect();
	assert_eq!(ids, vec!["52772", "3"]);
}

#[test]
fn non_object_entries_are_skipped() {
	let body = json!({ "meals": [null, 42, "Teriyaki", teriyaki()] });
	let drafts = MealsResponse::parse(&body.to_string()).unwrap().into_drafts();

	let ids: Vec<_> = drafts.iter().map(|d| d.external_id.as_str()).collect();
	assert_eq!(ids, vec!["52772"]);
}

#[test]
fn malformed_listing_is_an_error() {
	assert!(MealsResponse::parse("<html>").is_err());
	assert!(MealsResponse::parse(r#"{ "meals": "none" }"#).is_err());
}
