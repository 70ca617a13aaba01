use chrono::NaiveDate;
use std::cell::RefCell;
use std::fs;
use xbrlus::xbrl::transport::interpret_response;
use xbrlus::xbrl::{
    BaseElementQuery, CikLookupQuery, Document, FactsQuery, NetworksQuery, Node, Operation, Output, Params,
    QueryOutput, Request, Transport, Value, XbrlClient,
};
use xbrlus::XbrlError;

/// In-memory transport recording every request it receives.
struct MockTransport<F> {
    respond: F,
    calls: RefCell<Vec<Request>>,
}

impl<F> MockTransport<F>
where
    F: Fn(&Request) -> xbrlus::Result<Document>,
{
    fn new(respond: F) -> Self {
        Self {
            respond,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Request> {
        self.calls.borrow().clone()
    }
}

impl<F> Transport for MockTransport<F>
where
    F: Fn(&Request) -> xbrlus::Result<Document>,
{
    fn execute(&self, request: &Request) -> xbrlus::Result<Document> {
        self.calls.borrow_mut().push(request.clone());
        (self.respond)(request)
    }
}

fn read_data(name: &str) -> String {
    fs::read_to_string(format!("tests/data/{}", name))
        .unwrap_or_else(|e| panic!("Failed to read test file {}: {}", name, e))
}

fn xml(body: &str) -> xbrlus::Result<Document> {
    Document::parse(body)
}

/// One `<record_element>` per (key, value) row.
fn document(element: &str, rows: Vec<Vec<(&str, &str)>>) -> Document {
    let mut root = Node::new("dataRequest");
    for row in rows {
        let mut node = Node::new(element);
        for (key, value) in row {
            node = node.with_child(Node::leaf(key, Some(value)));
        }
        root = root.with_child(node);
    }
    Document::new(root)
}

fn date(y: i32, m: u32, d: u32) -> Value {
    Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

#[test]
fn test_facts_query_harmonizes_and_coerces() {
    let transport = MockTransport::new(|_| {
        xml(r#"<dataRequest>
                 <fact><amount>1234.5</amount><periodInstant>2014-12-31</periodInstant></fact>
                 <fact><amount>98765</amount><periodStart>2014-01-01</periodStart><periodEnd>2014-12-31</periodEnd></fact>
               </dataRequest>"#)
    });
    let client = XbrlClient::new(&transport);

    let table = client
        .facts(&FactsQuery::new().cik("0000320193").element(["Assets", "Revenues"]), Output::Table)
        .unwrap()
        .into_table()
        .unwrap();

    assert_eq!(transport.calls().len(), 1);
    assert_eq!(
        table.columns(),
        &["amount", "periodInstant", "periodStart", "periodEnd"].map(String::from)
    );
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(0, "amount"), Some(&Value::Number(1234.5)));
    assert_eq!(table.get(1, "amount"), Some(&Value::Number(98765.0)));
    assert_eq!(table.get(0, "periodInstant"), Some(&date(2014, 12, 31)));
    assert_eq!(table.get(0, "periodStart"), Some(&Value::Null));
    assert_eq!(table.get(0, "periodEnd"), Some(&Value::Null));
    assert_eq!(table.get(1, "periodStart"), Some(&date(2014, 1, 1)));
    assert_eq!(table.get(1, "periodInstant"), Some(&Value::Null));
}

#[test]
fn test_facts_query_joins_list_parameters() {
    let transport = MockTransport::new(|_| xml(&read_data("facts_revenues.xml")));
    let client = XbrlClient::new(&transport);

    let query = FactsQuery::new()
        .cik(["0000320193", "0000789019"])
        .element(["Assets", "Revenues"])
        .period("Y");
    client.facts(&query, Output::Table).unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].task, "xbrlValues");
    assert_eq!(calls[0].param("CIK"), Some("0000320193, 0000789019"));
    assert_eq!(calls[0].param("Element"), Some("Assets, Revenues"));
    assert_eq!(calls[0].param("Period"), Some("Y"));
}

#[test]
fn test_base_element_fans_out_in_order() {
    let transport = MockTransport::new(|request| {
        let element = request.param("Element").unwrap_or_default();
        let rows: Vec<(&str, &str)> = match element {
            "Assets" => vec![("elementName", "Assets"), ("balance", "debit")],
            "Revenues" => vec![("elementName", "Revenues"), ("periodType", "duration")],
            _ => vec![("elementName", element)],
        };
        Ok(document("baseElement", vec![rows]))
    });
    let client = XbrlClient::new(&transport);

    let table = client
        .base_element(
            &BaseElementQuery::new().element(["Assets", "Revenues", "Liabilities"]),
            Output::Table,
        )
        .unwrap()
        .into_table()
        .unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls.iter().filter_map(|c| c.param("Element")).collect::<Vec<_>>(),
        vec!["Assets", "Revenues", "Liabilities"]
    );

    assert_eq!(table.len(), 3);
    assert_eq!(table.columns(), &["elementName", "balance", "periodType"].map(String::from));
    assert_eq!(table.get(0, "periodType"), Some(&Value::Null));
    assert_eq!(table.get(1, "balance"), Some(&Value::Null));
    assert_eq!(table.get(2, "elementName"), Some(&Value::Text("Liabilities".into())));
    // no coercion outside the facts query
    assert_eq!(table.get(0, "balance"), Some(&Value::Text("debit".into())));
}

#[test]
fn test_fan_out_row_count_is_sum_of_calls() {
    let transport = MockTransport::new(|request| {
        let cik = request.param("CIK").unwrap_or_default();
        let rows = match cik {
            "1" => vec![vec![("cik", "1")], vec![("cik", "1")]],
            "2" => vec![],
            _ => vec![vec![("cik", "3")]],
        };
        Ok(document("fact", rows))
    });
    let client = XbrlClient::new(&transport);

    let table = client
        .cik_lookup(&CikLookupQuery::new().cik(["1", "2", "3"]), Output::Table)
        .unwrap()
        .into_table()
        .unwrap();

    assert_eq!(transport.calls().len(), 3);
    assert_eq!(table.len(), 3);
    let ciks: Vec<_> = table.column("cik").unwrap().into_iter().filter_map(Value::as_text).collect();
    assert_eq!(ciks, vec!["1", "1", "3"]);
}

#[test]
fn test_no_results_is_empty_table() {
    let transport = MockTransport::new(|_| xml("<dataRequest><count>0</count></dataRequest>"));
    let client = XbrlClient::new(&transport);

    let output = client.networks(&NetworksQuery::new().accession("0000320193-15-000009"), Output::Table);
    let table = output.unwrap().into_table().unwrap();
    assert!(table.is_empty());
    assert!(table.columns().is_empty());
}

#[test]
fn test_raw_output_returns_one_document_per_call() {
    let transport = MockTransport::new(|request| {
        Ok(document("fact", vec![vec![("cik", request.param("CIK").unwrap_or_default())]]))
    });
    let client = XbrlClient::new(&transport);

    let documents = client
        .cik_lookup(&CikLookupQuery::new().cik(["1", "2"]), Output::Raw)
        .unwrap()
        .into_documents()
        .unwrap();

    assert_eq!(documents.len(), 2);
    assert_eq!(documents[1].root.find_all("fact")[0].child("cik").unwrap().text.as_deref(), Some("2"));
}

#[test]
fn test_transport_error_aborts_fan_out() {
    let transport = MockTransport::new(|request| match request.param("Element") {
        Some("Missing") => interpret_response(404, Some("text/xml"), &read_data("error_404.xml")),
        _ => Ok(document("baseElement", vec![vec![("elementName", "Assets")]])),
    });
    let client = XbrlClient::new(&transport);

    let err = client
        .base_element(
            &BaseElementQuery::new().element(["Assets", "Missing", "Revenues"]),
            Output::Table,
        )
        .unwrap_err();

    // the third call is never made
    assert_eq!(transport.calls().len(), 2);
    assert_eq!(err.status(), Some(404));
    let message = err.to_string();
    assert!(message.contains("404"));
    assert!(message.contains("No facts found for requested CIK"));
}

#[test]
fn test_unknown_parameter_issues_no_calls() {
    let transport = MockTransport::new(|_| xml("<dataRequest/>"));
    let client = XbrlClient::new(&transport);

    let params = Params::new().with("Element", "Assets").with("Foo", "bar");
    let err = client.run(Operation::BaseElement, &params, Output::Table).unwrap_err();

    assert!(matches!(err, XbrlError::Validation(_)));
    assert!(transport.calls().is_empty());
}

#[test]
fn test_generic_run_matches_typed_query() {
    let transport = MockTransport::new(|_| xml(&read_data("facts_revenues.xml")));
    let client = XbrlClient::new(&transport);

    let typed = client.facts(&FactsQuery::new().cik("0000789019"), Output::Table).unwrap();
    let generic = client
        .run(Operation::Facts, &Params::new().with("CIK", "0000789019"), Output::Table)
        .unwrap();
    assert_eq!(typed, generic);

    let QueryOutput::Table(table) = typed else {
        panic!("expected a table");
    };
    assert_eq!(table.get(0, "decimals"), Some(&Value::Number(-6.0)));
    assert_eq!(table.get(0, "memberName"), Some(&Value::Null));
    assert_eq!(table.get(0, "periodEnd"), Some(&date(2015, 6, 30)));
}

#[test]
fn test_table_written_as_csv_file() {
    use std::io::{Read, Seek, SeekFrom};

    let transport = MockTransport::new(|_| xml(&read_data("facts_revenues.xml")));
    let client = XbrlClient::new(&transport);
    let table = client
        .facts(&FactsQuery::new().cik("0000789019"), Output::Table)
        .unwrap()
        .into_table()
        .unwrap();

    let mut file = tempfile::tempfile().unwrap();
    table.write_csv(&mut file).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();
    let mut written = String::new();
    file.read_to_string(&mut written).unwrap();

    let mut lines = written.lines();
    assert_eq!(
        lines.next(),
        Some("cik,elementName,amount,decimals,periodStart,periodEnd,memberName")
    );
    assert_eq!(
        lines.next(),
        Some("0000789019,Revenues,93580000000,-6,2014-07-01,2015-06-30,")
    );
    assert_eq!(lines.next(), None);
}
