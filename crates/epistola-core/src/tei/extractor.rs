use std::path::Path;

use thiserror::Error;

use super::correspondence::{Correspondence, CorrespondentPolicy};
use super::tree::{Element, XmlError};
use crate::record::{DocumentRecord, KeyedName, Person, Place};

const ID: &str = "msIdentifier/idno";
const REPOSITORY: &str = "msIdentifier/repository";
const TITLE: &str = "msItem/title";
const LANGUAGE: &str = "msItem/textLang";
const SUPPORT: &str = "supportDesc/support";
const EXTENT: &str = "supportDesc/extent";
const ORIGIN_DATE: &str = "origin/origDate";
const ORIGIN_PLACE: &str = "origin/origPlace";
const PERSONS: &str = "listPerson/person";
const PLACES: &str = "listPlace/place";
const CORRESP_ACTIONS: &str = "correspDesc/correspAction";
const BODY: &str = "text/body";

const XML_ID: &str = "xml:id";
const KEY: &str = "key";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Missing element: {path}")]
    MissingElement { path: String },
    #[error("Element has no text: {path}")]
    MissingText { path: String },
    #[error("Missing attribute {attribute} on {path}")]
    MissingAttribute { path: String, attribute: String },
    #[error("XML error: {0}")]
    Xml(#[from] XmlError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Maps a TEI manuscript description onto a [`DocumentRecord`] by fixed
/// structural paths. Any missing required field fails the whole document.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeiExtractor {
    correspondents: CorrespondentPolicy,
}

impl TeiExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_correspondent_policy(mut self, policy: CorrespondentPolicy) -> Self {
        self.correspondents = policy;
        self
    }

    pub async fn extract_file(&self, path: &Path) -> ExtractionResult<DocumentRecord> {
        let xml = tokio::fs::read_to_string(path).await?;
        self.extract_str(&xml)
    }

    pub fn extract_str(&self, xml: &str) -> ExtractionResult<DocumentRecord> {
        let root = Element::parse(xml)?;
        self.extract(&root)
    }

    pub fn extract(&self, root: &Element) -> ExtractionResult<DocumentRecord> {
        let origin_place = required(root, ORIGIN_PLACE)?;
        let origin_place = KeyedName::new(
            element_text(origin_place, ORIGIN_PLACE)?,
            origin_place.attr(KEY).map(String::from),
        );

        let (sender, receiver) = correspondence(root).resolve(self.correspondents);

        Ok(DocumentRecord {
            id: required_text(root, ID)?,
            repository: required_text(root, REPOSITORY)?,
            title: required_text(root, TITLE)?,
            language: required_text(root, LANGUAGE)?,
            support: normalized_text(required(root, SUPPORT)?),
            extent: required_text(root, EXTENT)?,
            origin_date: required_text(root, ORIGIN_DATE)?,
            origin_place,
            sender,
            receiver,
            body_text: normalized_text(required(root, BODY)?),
            persons: persons(root)?,
            places: places(root)?,
            triples: Vec::new(),
        })
    }
}

fn required<'a>(root: &'a Element, path: &str) -> ExtractionResult<&'a Element> {
    root.find(path)
        .ok_or_else(|| ExtractionError::MissingElement { path: path.into() })
}

fn required_text(root: &Element, path: &str) -> ExtractionResult<String> {
    element_text(required(root, path)?, path)
}

fn element_text(element: &Element, path: &str) -> ExtractionResult<String> {
    element
        .text()
        .map(String::from)
        .ok_or_else(|| ExtractionError::MissingText { path: path.into() })
}

fn required_attr(element: &Element, path: &str, attribute: &str) -> ExtractionResult<String> {
    element
        .attr(attribute)
        .map(String::from)
        .ok_or_else(|| ExtractionError::MissingAttribute {
            path: path.into(),
            attribute: attribute.into(),
        })
}

fn required_child<'a>(element: &'a Element, parent: &str, path: &str) -> ExtractionResult<&'a Element> {
    element
        .child_path(path)
        .ok_or_else(|| ExtractionError::MissingElement {
            path: format!("{parent}/{path}"),
        })
}

/// All text below `element` on one line, words separated by single spaces.
fn normalized_text(element: &Element) -> String {
    element
        .itertext()
        .into_iter()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn persons(root: &Element) -> ExtractionResult<Vec<Person>> {
    root.find_all(PERSONS)
        .into_iter()
        .map(|person| {
            let pers_name = required_child(person, PERSONS, "persName")?;
            let name_path = format!("{PERSONS}/persName");
            let forename = required_child(person, PERSONS, "persName/forename")?;
            let surname = required_child(person, PERSONS, "persName/surname")?;

            Ok(Person::new(
                required_attr(person, PERSONS, XML_ID)?,
                required_attr(pers_name, &name_path, KEY)?,
                element_text(forename, &format!("{name_path}/forename"))?,
                element_text(surname, &format!("{name_path}/surname"))?,
            ))
        })
        .collect()
}

fn places(root: &Element) -> ExtractionResult<Vec<Place>> {
    root.find_all(PLACES)
        .into_iter()
        .map(|place| {
            let place_name = required_child(place, PLACES, "placeName")?;
            let name_path = format!("{PLACES}/placeName");

            Ok(Place {
                id: required_attr(place, PLACES, XML_ID)?,
                key: required_attr(place_name, &name_path, KEY)?,
                name: element_text(place_name, &name_path)?,
            })
        })
        .collect()
}

/// Later actions of the same type replace earlier ones.
fn correspondence(root: &Element) -> Correspondence {
    let mut found = Correspondence::default();

    for action in root.find_all(CORRESP_ACTIONS) {
        let role = action.child("persName").and_then(|name| {
            KeyedName::complete(name.text().map(String::from), name.attr(KEY).map(String::from))
        });

        match action.attr("type") {
            Some("sent") => found.sender = role,
            Some("received") => found.receiver = role,
            _ => {}
        }
    }

    found
}
