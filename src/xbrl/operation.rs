use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// How a multi-valued parameter reaches the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Values are sent in one request as a `", "` separated list
    Join,
    /// The endpoint takes a single value: one request per value
    FanOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub policy: Policy,
}

const fn join(name: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        policy: Policy::Join,
    }
}

const fn fan_out(name: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        policy: Policy::FanOut,
    }
}

/// Declaration binding one logical operation to the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    pub operation: Operation,
    /// Value of the `Task` query parameter
    pub task: &'static str,
    pub params: &'static [ParamSpec],
    /// Name of the repeated element holding one result row
    pub record_element: &'static str,
    pub requires_credential: bool,
    /// Whether the numeric/date coercion pass runs on the result
    pub coerce: bool,
}

impl OperationSpec {
    pub fn param(&self, name: &str) -> Option<&'static ParamSpec> {
        self.params.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Operation {
    BaseElement,
    CikLookup,
    Children,
    Relationships,
    ExtensionElement,
    Networks,
    Facts,
}

static BASE_ELEMENT: OperationSpec = OperationSpec {
    operation: Operation::BaseElement,
    task: "xbrlBaseElement",
    params: &[fan_out("Element"), join("Namespace")],
    record_element: "baseElement",
    requires_credential: true,
    coerce: false,
};

static CIK_LOOKUP: OperationSpec = OperationSpec {
    operation: Operation::CikLookup,
    task: "xbrlCIKLookup",
    params: &[fan_out("CIK"), fan_out("Ticker")],
    record_element: "fact",
    requires_credential: true,
    coerce: false,
};

static CHILDREN: OperationSpec = OperationSpec {
    operation: Operation::Children,
    task: "xbrlChildren",
    params: &[fan_out("Element"), join("Network"), join("Accession"), join("CIK")],
    record_element: "fact",
    requires_credential: true,
    coerce: false,
};

static RELATIONSHIPS: OperationSpec = OperationSpec {
    operation: Operation::Relationships,
    task: "xbrlRelationships",
    params: &[fan_out("Element"), join("Network"), join("Linkbase"), join("Year")],
    record_element: "fact",
    requires_credential: true,
    coerce: false,
};

static EXTENSION_ELEMENT: OperationSpec = OperationSpec {
    operation: Operation::ExtensionElement,
    task: "xbrlExtensionElement",
    params: &[fan_out("Element"), join("Accession"), join("CIK")],
    record_element: "extensionElement",
    requires_credential: true,
    coerce: false,
};

static NETWORKS: OperationSpec = OperationSpec {
    operation: Operation::Networks,
    task: "xbrlNetworks",
    params: &[fan_out("Accession"), join("CIK"), join("Year"), join("Period")],
    record_element: "fact",
    requires_credential: true,
    coerce: false,
};

static FACTS: OperationSpec = OperationSpec {
    operation: Operation::Facts,
    task: "xbrlValues",
    params: &[
        join("CIK"),
        join("Ticker"),
        join("Element"),
        join("Axis"),
        join("Member"),
        join("Year"),
        join("Period"),
        join("NoYears"),
        join("DimReqd"),
        join("Restated"),
        join("Small"),
    ],
    record_element: "fact",
    requires_credential: true,
    coerce: true,
};

impl Operation {
    pub fn spec(self) -> &'static OperationSpec {
        match self {
            Operation::BaseElement => &BASE_ELEMENT,
            Operation::CikLookup => &CIK_LOOKUP,
            Operation::Children => &CHILDREN,
            Operation::Relationships => &RELATIONSHIPS,
            Operation::ExtensionElement => &EXTENSION_ELEMENT,
            Operation::Networks => &NETWORKS,
            Operation::Facts => &FACTS,
        }
    }

    pub fn list() -> String {
        Operation::iter()
            .map(|op| op.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
