use pretty_assertions::assert_eq;
use raml_core::{parse_raml_str, AppError, Content, ParameterLocation, ParserConfig};

const API: &str = r#"#%RAML 0.8
title: Example API
version: v1
baseUri: https://api.example.com/{version}
mediaType: application/json
resourceTypes:
  - collection:
      description: A collection of items
      get:
        description: List the items
        headers:
          X-Page-Token:
            type: string
        responses:
          200:
            body:
              application/json:
                schema: '{"type": "array"}'
      post:
        description: Create an item
        body:
          application/json:
            example: '{"name": "x"}'
/widgets:
  type: collection
  post:
    description: Create a widget
    body:
      application/x-www-form-urlencoded:
        formParameters:
          name:
            type: string
            required: true
  /{widgetId}:
    get:
      queryParameters:
        fields:
          type: string
          pattern: "^[a-z,]+$"
      responses:
        200:
          headers:
            ETag: {}
        404:
          description: No such widget
"#;

#[test]
fn test_resources_inherit_per_method() {
    let api = parse_raml_str(API, &ParserConfig::default()).unwrap();
    assert_eq!(api.title, "Example API");
    assert_eq!(api.protocols, vec!["HTTPS".to_string()]);
    assert_eq!(api.resource_types.len(), 2);
    assert_eq!(api.find_resource_type("collection").unwrap().method.as_deref(), Some("get"));

    let summary: Vec<(String, Option<String>)> = api
        .resources
        .iter()
        .map(|r| (r.path.clone(), r.method.clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("/widgets".to_string(), Some("post".to_string())),
            ("/widgets".to_string(), Some("get".to_string())),
            ("/widgets/{widgetId}".to_string(), Some("get".to_string())),
        ]
    );

    // post: explicit body and description win over the template
    let post = &api.resources[0];
    assert_eq!(post.description.as_ref().map(Content::raw), Some("Create a widget"));
    assert_eq!(post.body.len(), 1);
    assert_eq!(post.body[0].mime_type, "application/x-www-form-urlencoded");
    let form = post.body[0].form_params.as_ref().unwrap();
    assert_eq!(form[0].location, ParameterLocation::Form);
    assert!(form[0].required);

    // get: nothing declared on the node, everything comes from the template
    let get = &api.resources[1];
    assert_eq!(get.description.as_ref().map(Content::raw), Some("List the items"));
    assert_eq!(get.headers[0].name, "X-Page-Token");
    assert_eq!(get.headers[0].method.as_deref(), Some("get"));
    assert_eq!(get.responses[0].code, 200);
    let schema = get.responses[0].body[0].schema.as_ref().unwrap();
    assert_eq!(schema.get("type").and_then(|v| v.as_str()), Some("array"));

    // nested resource: no template, implicit URI parameter
    let member = &api.resources[2];
    assert!(member.resource_type.is_none());
    assert_eq!(member.absolute_uri, "https://api.example.com/{version}/widgets/{widgetId}");
    assert_eq!(member.uri_params.len(), 1);
    assert_eq!(member.uri_params[0].name, "widgetId");
    assert!(member.uri_params[0].required);
    assert_eq!(member.query_params[0].pattern.as_deref(), Some("^[a-z,]+$"));
    let codes: Vec<u16> = member.responses.iter().map(|r| r.code).collect();
    assert_eq!(codes, vec![200, 404]);
    assert_eq!(member.responses[0].headers[0].name, "ETag");
}

#[test]
fn test_first_invalid_declaration_is_reported() {
    let doc = API.replace("404:", "999:");
    let err = parse_raml_str(&doc, &ParserConfig::default()).unwrap_err();
    match err {
        AppError::InvalidField { field, value, .. } => {
            assert_eq!(field, "code");
            assert_eq!(value, "999");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // Validators are skipped when validation is off.
    let api = parse_raml_str(&doc, &ParserConfig::lenient()).unwrap();
    assert_eq!(api.resources[2].responses[1].code, 999);
}

#[test]
fn test_form_body_with_schema_is_rejected() {
    let doc = API.replace(
        "        formParameters:\n          name:\n            type: string\n            required: true\n",
        "        schema: '{}'\n",
    );
    let err = parse_raml_str(&doc, &ParserConfig::default()).unwrap_err();
    assert!(matches!(err, AppError::InvalidField { ref field, .. } if field == "schema"));
}
