//! Turning a user-typed `who` argument into a roster entry.

use anyhow::{Result, anyhow, bail};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use mentor_core::person::Person;
use uuid::Uuid;

/// Pick the person `who` refers to.
///
/// A UUID matches by id. Otherwise an exact case-insensitive name match
/// wins, and failing that the best fuzzy match. Ties on fuzzy score are an
/// error so a typo never silently targets the wrong person.
pub fn resolve<'a>(people: &'a [Person], who: &str) -> Result<&'a Person> {
  let who = who.trim();
  if let Ok(id) = who.parse::<Uuid>() {
    return people
      .iter()
      .find(|p| p.id == id)
      .ok_or_else(|| anyhow!("no person with id {id}"));
  }

  let lowered = who.to_lowercase();
  if let Some(p) = people.iter().find(|p| p.name.to_lowercase() == lowered) {
    return Ok(p);
  }

  let matcher = SkimMatcherV2::default();
  let mut scored: Vec<(i64, &Person)> = people
    .iter()
    .filter_map(|p| matcher.fuzzy_match(&p.name, who).map(|s| (s, p)))
    .collect();
  scored.sort_by(|a, b| b.0.cmp(&a.0));

  match scored.as_slice() {
    [] => bail!("nobody matches {who:?}"),
    [(best, _), (next, _), ..] if best == next => {
      let names: Vec<&str> = scored
        .iter()
        .take_while(|(s, _)| s == best)
        .map(|(_, p)| p.name.as_str())
        .collect();
      bail!("{who:?} is ambiguous: {}", names.join(", "))
    }
    [(_, p), ..] => Ok(p),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn roster() -> Vec<Person> {
    ["Sally", "Moe", "Wanda", "Sam"]
      .into_iter()
      .map(Person::new)
      .collect()
  }

  #[test]
  fn uuid_selects_by_id() {
    let people = roster();
    let id = people[2].id;
    assert_eq!(resolve(&people, &id.to_string()).unwrap().name, "Wanda");
    assert!(resolve(&people, &Uuid::new_v4().to_string()).is_err());
  }

  #[test]
  fn exact_name_ignores_case_and_padding() {
    let people = roster();
    assert_eq!(resolve(&people, "  moe ").unwrap().name, "Moe");
    assert_eq!(resolve(&people, "SAM").unwrap().name, "Sam");
  }

  #[test]
  fn fuzzy_fallback_finds_close_names() {
    let people = roster();
    assert_eq!(resolve(&people, "wnd").unwrap().name, "Wanda");
  }

  #[test]
  fn no_match_is_an_error() {
    let people = roster();
    let err = resolve(&people, "xyzzy").unwrap_err();
    assert!(err.to_string().contains("nobody matches"));
  }
}
