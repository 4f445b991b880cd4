//! Sheet schema registry
//!
//! The closed set of COBie sheet kinds and the column layout each one fixes.
//! Name-to-shape dispatch happens in exactly one place, [`SheetKind::from_name`];
//! everything else matches on the enum.
//!
//! Per-kind merge policy lives here too, as two flags consulted by the
//! federation loop:
//!
//! - `dedup_exempt`: rows are appended without fingerprint comparison
//!   (Coordinate: geometry order and identity matter downstream)
//! - `single_copy_only`: only the first contributing source is merged
//!   (PickLists: reference lists are representative across sources)

use crate::workbook::Sheet;
use cobie_common::{CobieError, Result};
use serde::{Deserialize, Serialize};

/// One of the 19 COBie sheet kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SheetKind {
    Contact,
    Facility,
    Floor,
    Space,
    Zone,
    Type,
    Component,
    System,
    Assembly,
    Connection,
    Spare,
    Resource,
    Job,
    Impact,
    Document,
    Attribute,
    Coordinate,
    Issue,
    PickLists,
}

impl SheetKind {
    /// Every kind, in conventional workbook order
    pub const ALL: [SheetKind; 19] = [
        SheetKind::Contact,
        SheetKind::Facility,
        SheetKind::Floor,
        SheetKind::Space,
        SheetKind::Zone,
        SheetKind::Type,
        SheetKind::Component,
        SheetKind::System,
        SheetKind::Assembly,
        SheetKind::Connection,
        SheetKind::Spare,
        SheetKind::Resource,
        SheetKind::Job,
        SheetKind::Impact,
        SheetKind::Document,
        SheetKind::Attribute,
        SheetKind::Coordinate,
        SheetKind::Issue,
        SheetKind::PickLists,
    ];

    /// Sheet name as it appears in a workbook
    pub fn name(self) -> &'static str {
        match self {
            SheetKind::Contact => "Contact",
            SheetKind::Facility => "Facility",
            SheetKind::Floor => "Floor",
            SheetKind::Space => "Space",
            SheetKind::Zone => "Zone",
            SheetKind::Type => "Type",
            SheetKind::Component => "Component",
            SheetKind::System => "System",
            SheetKind::Assembly => "Assembly",
            SheetKind::Connection => "Connection",
            SheetKind::Spare => "Spare",
            SheetKind::Resource => "Resource",
            SheetKind::Job => "Job",
            SheetKind::Impact => "Impact",
            SheetKind::Document => "Document",
            SheetKind::Attribute => "Attribute",
            SheetKind::Coordinate => "Coordinate",
            SheetKind::Issue => "Issue",
            SheetKind::PickLists => "PickLists",
        }
    }

    /// Resolve a sheet name, ignoring ASCII case and surrounding whitespace
    pub fn from_name(name: &str) -> Option<SheetKind> {
        let name = name.trim();
        SheetKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// A sheet of this kind with no rows
    pub fn create_empty_sheet(self) -> Sheet {
        Sheet::for_kind(self)
    }

    /// Full schema for this kind
    pub fn schema(self) -> SheetSchema {
        SheetSchema {
            kind: self,
            columns: self.columns(),
            dedup_exempt: matches!(self, SheetKind::Coordinate),
            single_copy_only: matches!(self, SheetKind::PickLists),
        }
    }

    fn columns(self) -> &'static [ColumnDef] {
        match self {
            SheetKind::Contact => CONTACT,
            SheetKind::Facility => FACILITY,
            SheetKind::Floor => FLOOR,
            SheetKind::Space => SPACE,
            SheetKind::Zone => ZONE,
            SheetKind::Type => TYPE,
            SheetKind::Component => COMPONENT,
            SheetKind::System => SYSTEM,
            SheetKind::Assembly => ASSEMBLY,
            SheetKind::Connection => CONNECTION,
            SheetKind::Spare => SPARE,
            SheetKind::Resource => RESOURCE,
            SheetKind::Job => JOB,
            SheetKind::Impact => IMPACT,
            SheetKind::Document => DOCUMENT,
            SheetKind::Attribute => ATTRIBUTE,
            SheetKind::Coordinate => COORDINATE,
            SheetKind::Issue => ISSUE,
            SheetKind::PickLists => PICKLISTS,
        }
    }
}

impl std::fmt::Display for SheetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for SheetKind {
    type Err = CobieError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        SheetKind::from_name(s).ok_or_else(|| CobieError::UnknownSheetKind(s.to_string()))
    }
}

/// Value type a column holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Text,
    Integer,
    Decimal,
    Boolean,
    DateTime,
    /// Several strings in one cell
    List,
}

/// Cross-sheet reference held by a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    None,
    /// Names a row of a fixed sheet (every element, for list columns)
    Sheet(SheetKind),
    /// Names a row of the sheet whose name is in the given sibling column
    RowOf(&'static str),
}

/// One column of a sheet schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub column_type: ColumnType,
    /// Part of the row's identity within its sheet
    pub primary: bool,
    pub reference: Reference,
    pub required: bool,
    /// Whether the column contributes to the row fingerprint
    pub significant: bool,
}

impl ColumnDef {
    const fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            primary: false,
            reference: Reference::None,
            required: false,
            significant: true,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn primary(mut self) -> Self {
        self.primary = true;
        self.required = true;
        self
    }

    const fn refs(mut self, kind: SheetKind) -> Self {
        self.reference = Reference::Sheet(kind);
        self
    }

    const fn row_of(mut self, sheet_column: &'static str) -> Self {
        self.reference = Reference::RowOf(sheet_column);
        self
    }

    /// Identifier / bookkeeping column, left out of the fingerprint
    const fn provenance(mut self) -> Self {
        self.significant = false;
        self
    }
}

/// Ordered, typed column layout plus merge policy for one sheet kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetSchema {
    pub kind: SheetKind,
    pub columns: &'static [ColumnDef],
    pub dedup_exempt: bool,
    pub single_copy_only: bool,
}

impl SheetSchema {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of a column by name (ASCII case-insensitive)
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name.trim()))
    }

    /// The designated key/name field used for cross-sheet lookups
    pub fn key_column(&self) -> Option<usize> {
        self.columns.iter().position(|c| c.primary)
    }

    /// All columns forming the row's identity within the sheet
    pub fn primary_columns(&self) -> impl Iterator<Item = (usize, &'static ColumnDef)> {
        let columns: &'static [ColumnDef] = self.columns;
        columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.primary)
    }
}

/// Look up the schema registered for a sheet name
pub fn lookup(name: &str) -> Option<SheetSchema> {
    SheetKind::from_name(name).map(SheetKind::schema)
}

/// Create an empty sheet of the kind registered under `name`
pub fn create_empty_sheet(name: &str) -> Result<Sheet> {
    let kind = SheetKind::from_name(name)
        .ok_or_else(|| CobieError::UnknownSheetKind(name.to_string()))?;
    Ok(kind.create_empty_sheet())
}

// ============================================================================
// Column layouts
// ============================================================================

use ColumnType::{DateTime, Decimal, Integer, List, Text};

const fn col(name: &'static str, column_type: ColumnType) -> ColumnDef {
    ColumnDef::new(name, column_type)
}

const CREATED_BY: ColumnDef = col("CreatedBy", Text).refs(SheetKind::Contact).provenance();
const CREATED_ON: ColumnDef = col("CreatedOn", DateTime).provenance();
const EXT_SYSTEM: ColumnDef = col("ExtSystem", Text).provenance();
const EXT_OBJECT: ColumnDef = col("ExtObject", Text).provenance();
const EXT_IDENTIFIER: ColumnDef = col("ExtIdentifier", Text).provenance();

const CONTACT: &[ColumnDef] = &[
    col("Email", Text).primary(),
    CREATED_BY,
    CREATED_ON,
    col("Category", Text).required(),
    col("Company", Text).required(),
    col("Phone", Text),
    EXT_SYSTEM,
    EXT_OBJECT,
    EXT_IDENTIFIER,
    col("Department", Text),
    col("OrganizationCode", Text),
    col("GivenName", Text),
    col("FamilyName", Text),
    col("Street", Text),
    col("PostalBox", Text),
    col("Town", Text),
    col("StateRegion", Text),
    col("PostalCode", Text),
    col("Country", Text),
];

const FACILITY: &[ColumnDef] = &[
    col("Name", Text).primary(),
    CREATED_BY,
    CREATED_ON,
    col("Category", Text).required(),
    col("ProjectName", Text).required(),
    col("SiteName", Text).required(),
    col("LinearUnits", Text),
    col("AreaUnits", Text),
    col("VolumeUnits", Text),
    col("CurrencyUnit", Text),
    col("AreaMeasurement", Text),
    EXT_SYSTEM,
    col("ExternalProjectObject", Text).provenance(),
    col("ExternalProjectIdentifier", Text).provenance(),
    col("ExternalSiteObject", Text).provenance(),
    col("ExternalSiteIdentifier", Text).provenance(),
    col("ExternalFacilityObject", Text).provenance(),
    col("ExternalFacilityIdentifier", Text).provenance(),
    col("Description", Text),
    col("ProjectDescription", Text),
    col("SiteDescription", Text),
    col("Phase", Text),
];

const FLOOR: &[ColumnDef] = &[
    col("Name", Text).primary(),
    CREATED_BY,
    CREATED_ON,
    col("Category", Text).required(),
    EXT_SYSTEM,
    EXT_OBJECT,
    EXT_IDENTIFIER,
    col("Description", Text),
    col("Elevation", Decimal),
    col("Height", Decimal),
];

const SPACE: &[ColumnDef] = &[
    col("Name", Text).primary(),
    CREATED_BY,
    CREATED_ON,
    col("Category", Text).required(),
    col("FloorName", Text).required().refs(SheetKind::Floor),
    col("Description", Text),
    EXT_SYSTEM,
    EXT_OBJECT,
    EXT_IDENTIFIER,
    col("RoomTag", Text),
    col("UsableHeight", Decimal),
    col("GrossArea", Decimal),
    col("NetArea", Decimal),
];

const ZONE: &[ColumnDef] = &[
    col("Name", Text).primary(),
    CREATED_BY,
    CREATED_ON,
    col("Category", Text).required(),
    col("SpaceNames", List).required().refs(SheetKind::Space),
    EXT_SYSTEM,
    EXT_OBJECT,
    EXT_IDENTIFIER,
    col("Description", Text),
];

const TYPE: &[ColumnDef] = &[
    col("Name", Text).primary(),
    CREATED_BY,
    CREATED_ON,
    col("Category", Text).required(),
    col("Description", Text),
    col("AssetType", Text),
    col("Manufacturer", Text).refs(SheetKind::Contact),
    col("ModelNumber", Text),
    col("WarrantyGuarantorParts", Text).refs(SheetKind::Contact),
    col("WarrantyDurationParts", Decimal),
    col("WarrantyGuarantorLabor", Text).refs(SheetKind::Contact),
    col("WarrantyDurationLabor", Decimal),
    col("WarrantyDurationUnit", Text),
    EXT_SYSTEM,
    EXT_OBJECT,
    EXT_IDENTIFIER,
    col("ReplacementCost", Decimal),
    col("ExpectedLife", Decimal),
    col("DurationUnit", Text),
    col("NominalLength", Decimal),
    col("NominalWidth", Decimal),
    col("NominalHeight", Decimal),
    col("ModelReference", Text),
    col("Shape", Text),
    col("Size", Text),
    col("Color", Text),
    col("Finish", Text),
    col("Grade", Text),
    col("Material", Text),
    col("Features", Text),
];

const COMPONENT: &[ColumnDef] = &[
    col("Name", Text).primary(),
    CREATED_BY,
    CREATED_ON,
    col("TypeName", Text).required().refs(SheetKind::Type),
    col("Space", List).required().refs(SheetKind::Space),
    col("Description", Text),
    EXT_SYSTEM,
    EXT_OBJECT,
    EXT_IDENTIFIER,
    col("SerialNumber", Text),
    col("InstallationDate", DateTime),
    col("WarrantyStartDate", DateTime),
    col("TagNumber", Text),
    col("BarCode", Text),
    col("AssetIdentifier", Text),
];

const SYSTEM: &[ColumnDef] = &[
    col("Name", Text).primary(),
    CREATED_BY,
    CREATED_ON,
    col("Category", Text).required(),
    col("ComponentNames", List).required().refs(SheetKind::Component),
    EXT_SYSTEM,
    EXT_OBJECT,
    EXT_IDENTIFIER,
    col("Description", Text),
];

const ASSEMBLY: &[ColumnDef] = &[
    col("Name", Text).primary(),
    CREATED_BY,
    CREATED_ON,
    col("SheetName", Text).required(),
    col("ParentName", Text).required().row_of("SheetName"),
    col("ChildNames", List).required().row_of("SheetName"),
    col("AssemblyType", Text),
    EXT_SYSTEM,
    EXT_OBJECT,
    EXT_IDENTIFIER,
    col("Description", Text),
];

const CONNECTION: &[ColumnDef] = &[
    col("Name", Text).primary(),
    CREATED_BY,
    CREATED_ON,
    col("ConnectionType", Text).required(),
    col("SheetName", Text).required(),
    col("RowName1", Text).required().row_of("SheetName"),
    col("RowName2", Text).required().row_of("SheetName"),
    col("RealizingElement", Text),
    col("PortName1", Text),
    col("PortName2", Text),
    EXT_SYSTEM,
    EXT_OBJECT,
    EXT_IDENTIFIER,
    col("Description", Text),
];

const SPARE: &[ColumnDef] = &[
    col("Name", Text).primary(),
    CREATED_BY,
    CREATED_ON,
    col("Category", Text).required(),
    col("TypeName", Text).required().refs(SheetKind::Type),
    col("Suppliers", List).refs(SheetKind::Contact),
    EXT_SYSTEM,
    EXT_OBJECT,
    EXT_IDENTIFIER,
    col("Description", Text),
    col("SetNumber", Text),
    col("PartNumber", Text),
];

const RESOURCE: &[ColumnDef] = &[
    col("Name", Text).primary(),
    CREATED_BY,
    CREATED_ON,
    col("Category", Text).required(),
    EXT_SYSTEM,
    EXT_OBJECT,
    EXT_IDENTIFIER,
    col("Description", Text),
];

const JOB: &[ColumnDef] = &[
    col("Name", Text).primary(),
    CREATED_BY,
    CREATED_ON,
    col("Category", Text).required(),
    col("Status", Text),
    col("TypeName", Text).required().refs(SheetKind::Type),
    col("Description", Text),
    col("Duration", Decimal),
    col("DurationUnit", Text),
    col("Start", Text),
    col("TaskStartUnit", Text),
    col("Frequency", Decimal),
    col("FrequencyUnit", Text),
    EXT_SYSTEM,
    EXT_OBJECT,
    EXT_IDENTIFIER,
    col("TaskNumber", Integer),
    col("Priors", List),
    col("ResourceNames", List).refs(SheetKind::Resource),
];

const IMPACT: &[ColumnDef] = &[
    col("Name", Text).primary(),
    CREATED_BY,
    CREATED_ON,
    col("ImpactType", Text).required(),
    col("ImpactStage", Text),
    col("SheetName", Text).primary(),
    col("RowName", Text).primary().row_of("SheetName"),
    col("Value", Decimal),
    col("ImpactUnit", Text),
    col("LeadInTime", Decimal),
    col("Duration", Decimal),
    col("LeadOutTime", Decimal),
    EXT_SYSTEM,
    EXT_OBJECT,
    EXT_IDENTIFIER,
    col("Description", Text),
];

const DOCUMENT: &[ColumnDef] = &[
    col("Name", Text).primary(),
    CREATED_BY,
    CREATED_ON,
    col("Category", Text).required(),
    col("ApprovalBy", Text),
    col("Stage", Text).primary(),
    col("SheetName", Text).primary(),
    col("RowName", Text).primary().row_of("SheetName"),
    col("Directory", Text),
    col("File", Text),
    EXT_SYSTEM,
    EXT_OBJECT,
    EXT_IDENTIFIER,
    col("Description", Text),
    col("Reference", Text),
];

const ATTRIBUTE: &[ColumnDef] = &[
    col("Name", Text).primary(),
    CREATED_BY,
    CREATED_ON,
    col("Category", Text),
    col("SheetName", Text).primary(),
    col("RowName", Text).primary().row_of("SheetName"),
    col("Value", Text),
    col("Unit", Text),
    EXT_SYSTEM,
    EXT_OBJECT,
    EXT_IDENTIFIER,
    col("Description", Text),
    col("AllowedValues", List),
];

const COORDINATE: &[ColumnDef] = &[
    col("Name", Text).primary(),
    CREATED_BY,
    CREATED_ON,
    col("Category", Text).primary(),
    col("SheetName", Text).primary(),
    col("RowName", Text).primary().row_of("SheetName"),
    col("CoordinateXAxis", Decimal).required(),
    col("CoordinateYAxis", Decimal).required(),
    col("CoordinateZAxis", Decimal).required(),
    EXT_SYSTEM,
    EXT_OBJECT,
    EXT_IDENTIFIER,
    col("ClockwiseRotation", Decimal),
    col("ElevationalRotation", Decimal),
    col("YawRotation", Decimal),
];

const ISSUE: &[ColumnDef] = &[
    col("Name", Text).primary(),
    CREATED_BY,
    CREATED_ON,
    col("Type", Text).required(),
    col("Risk", Text),
    col("Chance", Text),
    col("Impact", Text),
    col("SheetName1", Text),
    col("RowName1", Text).row_of("SheetName1"),
    col("SheetName2", Text),
    col("RowName2", Text).row_of("SheetName2"),
    col("Description", Text),
    col("Owner", Text).refs(SheetKind::Contact),
    col("Mitigation", Text),
    EXT_SYSTEM,
    EXT_OBJECT,
    EXT_IDENTIFIER,
];

const PICKLISTS: &[ColumnDef] = &[
    col("ApprovalBy", Text),
    col("AreaUnit", Text),
    col("AssetType", Text),
    col("CategoryFacility", Text),
    col("CategorySpace", Text),
    col("CategoryElement", Text),
    col("CategoryProduct", Text),
    col("CategoryRole", Text),
    col("CoordinateSheet", Text),
    col("ConnectionType", Text),
    col("CoordinateType", Text),
    col("DocumentType", Text),
    col("DurationUnit", Text),
    col("FloorType", Text),
    col("IssueCategory", Text),
    col("IssueChance", Text),
    col("IssueImpact", Text),
    col("IssueRisk", Text),
    col("JobStatusType", Text),
    col("JobType", Text),
    col("LinearUnits", Text),
    col("ObjAttribute", Text),
    col("ObjAttributeType", Text),
    col("ObjComponent", Text),
    col("ObjType", Text),
    col("ResourceType", Text),
    col("SpareType", Text),
    col("StageType", Text),
    col("VolumeUnit", Text),
    col("ZoneType", Text),
];
