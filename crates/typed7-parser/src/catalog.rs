//! Built-in HL7 v2.3 segment and composite layouts
//!
//! The layouts cover the segments of the common ADT/ORU flows. They are
//! data, not code: adding a segment means adding a table. Environments
//! with local extensions can layer their own [`SegmentRegistry`] over (or
//! instead of) [`DefaultRegistry`].

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::schema::{
    CompositeSchema, FieldKind::Composite, FieldKind::Primitive, PrimitiveKind::*,
    SegmentRegistry, SegmentSchema, field, repeated,
};

// Composite types

pub static CE: CompositeSchema = CompositeSchema {
    name: "CE",
    fields: &[
        field("Identifier", Primitive(St)),
        field("Text", Primitive(St)),
        field("Name of Coding System", Primitive(St)),
        field("Alternate Identifier", Primitive(St)),
        field("Alternate Text", Primitive(St)),
        field("Name of Alternate Coding System", Primitive(St)),
    ],
};

pub static CX: CompositeSchema = CompositeSchema {
    name: "CX",
    fields: &[
        field("ID", Primitive(St)),
        field("Check Digit", Primitive(St)),
        field("Code Identifying the Check Digit Scheme", Primitive(Id)),
        field("Assigning Authority", Primitive(Hd)),
        field("Identifier Type Code", Primitive(Is)),
        field("Assigning Facility", Primitive(Hd)),
    ],
};

pub static XPN: CompositeSchema = CompositeSchema {
    name: "XPN",
    fields: &[
        field("Family Name", Primitive(St)),
        field("Given Name", Primitive(St)),
        field("Middle Initial or Name", Primitive(St)),
        field("Suffix", Primitive(St)),
        field("Prefix", Primitive(St)),
        field("Degree", Primitive(St)),
        field("Name Type Code", Primitive(Id)),
        field("Name Representation Code", Primitive(Id)),
    ],
};

pub static XAD: CompositeSchema = CompositeSchema {
    name: "XAD",
    fields: &[
        field("Street Address", Primitive(St)),
        field("Other Designation", Primitive(St)),
        field("City", Primitive(St)),
        field("State or Province", Primitive(St)),
        field("Zip or Postal Code", Primitive(St)),
        field("Country", Primitive(Id)),
        field("Address Type", Primitive(Id)),
        field("Other Geographic Designation", Primitive(St)),
        field("County/Parish Code", Primitive(Is)),
        field("Census Tract", Primitive(Is)),
    ],
};

pub static XTN: CompositeSchema = CompositeSchema {
    name: "XTN",
    fields: &[
        field("Telephone Number", Primitive(Tn)),
        field("Telecommunication Use Code", Primitive(Id)),
        field("Telecommunication Equipment Type", Primitive(Id)),
        field("Email Address", Primitive(St)),
        field("Country Code", Primitive(Nm)),
        field("Area/City Code", Primitive(Nm)),
        field("Phone Number", Primitive(Snm)),
        field("Extension", Primitive(Nm)),
        field("Any Text", Primitive(St)),
    ],
};

pub static XCN: CompositeSchema = CompositeSchema {
    name: "XCN",
    fields: &[
        field("ID Number", Primitive(St)),
        field("Family Name", Primitive(St)),
        field("Given Name", Primitive(St)),
        field("Middle Initial or Name", Primitive(St)),
        field("Suffix", Primitive(St)),
        field("Prefix", Primitive(St)),
        field("Degree", Primitive(St)),
        field("Source Table", Primitive(Is)),
        field("Assigning Authority", Primitive(Hd)),
        field("Name Type Code", Primitive(Id)),
        field("Identifier Check Digit", Primitive(St)),
        field("Code Identifying the Check Digit Scheme", Primitive(Id)),
        field("Identifier Type Code", Primitive(Is)),
        field("Assigning Facility", Primitive(Hd)),
    ],
};

pub static PL: CompositeSchema = CompositeSchema {
    name: "PL",
    fields: &[
        field("Point of Care", Primitive(Is)),
        field("Room", Primitive(Is)),
        field("Bed", Primitive(Is)),
        field("Facility", Primitive(Hd)),
        field("Location Status", Primitive(Is)),
        field("Person Location Type", Primitive(Is)),
        field("Building", Primitive(Is)),
        field("Floor", Primitive(Is)),
        field("Location Description", Primitive(St)),
    ],
};

pub static EI: CompositeSchema = CompositeSchema {
    name: "EI",
    fields: &[
        field("Entity Identifier", Primitive(St)),
        field("Namespace ID", Primitive(Is)),
        field("Universal ID", Primitive(St)),
        field("Universal ID Type", Primitive(Id)),
    ],
};

pub static PT: CompositeSchema = CompositeSchema {
    name: "PT",
    fields: &[
        field("Processing ID", Primitive(Id)),
        field("Processing Mode", Primitive(Id)),
    ],
};

pub static FC: CompositeSchema = CompositeSchema {
    name: "FC",
    fields: &[
        field("Financial Class", Primitive(Is)),
        field("Effective Date", Primitive(Ts)),
    ],
};

pub static CQ: CompositeSchema = CompositeSchema {
    name: "CQ",
    fields: &[field("Quantity", Primitive(Nm)), field("Units", Composite(&CE))],
};

pub static DLN: CompositeSchema = CompositeSchema {
    name: "DLN",
    fields: &[
        field("License Number", Primitive(St)),
        field("Issuing State, Province, Country", Primitive(Is)),
        field("Expiration Date", Primitive(Dt)),
    ],
};

pub static CM_MSG: CompositeSchema = CompositeSchema {
    name: "CM_MSG",
    fields: &[field("Message Type", Primitive(Id)), field("Trigger Event", Primitive(Id))],
};

// Segment types

pub static MSH: SegmentSchema = SegmentSchema {
    name: "MSH",
    fields: &[
        field("Encoding Characters", Primitive(Delimiters)),
        field("Sending Application", Primitive(Hd)),
        field("Sending Facility", Primitive(Hd)),
        field("Receiving Application", Primitive(Hd)),
        field("Receiving Facility", Primitive(Hd)),
        field("Date/Time of Message", Primitive(Ts)),
        field("Security", Primitive(St)),
        field("Message Type", Composite(&CM_MSG)),
        field("Message Control ID", Primitive(St)),
        field("Processing ID", Composite(&PT)),
        field("Version ID", Primitive(Id)),
        field("Sequence Number", Primitive(Nm)),
        field("Continuation Pointer", Primitive(St)),
        field("Accept Acknowledgment Type", Primitive(Id)),
        field("Application Acknowledgment Type", Primitive(Id)),
        field("Country Code", Primitive(Id)),
        repeated("Character Set", Primitive(Id)),
        field("Principal Language of Message", Composite(&CE)),
    ],
};

/// Index of the MSH character set slot (the second-to-last field).
pub(crate) const MSH_CHARACTER_SET_INDEX: usize = 16;
/// Index of the MSH message type slot.
pub(crate) const MSH_MESSAGE_TYPE_INDEX: usize = 7;

pub static MSA: SegmentSchema = SegmentSchema {
    name: "MSA",
    fields: &[
        field("Acknowledgment Code", Primitive(Id)),
        field("Message Control ID", Primitive(St)),
        field("Text Message", Primitive(St)),
        field("Expected Sequence Number", Primitive(Nm)),
        field("Delayed Acknowledgment Type", Primitive(Id)),
        field("Error Condition", Composite(&CE)),
    ],
};

pub static ERR: SegmentSchema = SegmentSchema {
    name: "ERR",
    fields: &[repeated("Error Code and Location", Primitive(Cm))],
};

pub static EVN: SegmentSchema = SegmentSchema {
    name: "EVN",
    fields: &[
        field("Event Type Code", Primitive(Id)),
        field("Recorded Date/Time", Primitive(Ts)),
        field("Date/Time Planned Event", Primitive(Ts)),
        field("Event Reason Code", Primitive(Is)),
        field("Operator ID", Primitive(Is)),
        field("Event Occurred", Primitive(Ts)),
    ],
};

pub static PID: SegmentSchema = SegmentSchema {
    name: "PID",
    fields: &[
        field("Set ID", Primitive(Si)),
        field("Patient ID (External ID)", Composite(&CX)),
        repeated("Patient ID", Composite(&CX)),
        repeated("Alternate Patient ID", Composite(&CX)),
        repeated("Patient Name", Composite(&XPN)),
        field("Mother's Maiden Name", Composite(&XPN)),
        field("Date/Time of Birth", Primitive(Ts)),
        field("Sex", Primitive(Is)),
        repeated("Patient Alias", Composite(&XPN)),
        field("Race", Primitive(Is)),
        repeated("Patient Address", Composite(&XAD)),
        field("County Code", Primitive(Is)),
        repeated("Phone Number - Home", Composite(&XTN)),
        repeated("Phone Number - Business", Composite(&XTN)),
        field("Primary Language", Composite(&CE)),
        field("Marital Status", Primitive(Is)),
        field("Religion", Primitive(Is)),
        field("Patient Account Number", Composite(&CX)),
        field("SSN Number", Primitive(St)),
        field("Driver's License Number", Composite(&DLN)),
        field("Mother's Identifier", Composite(&CX)),
        field("Ethnic Group", Primitive(Is)),
        field("Birth Place", Primitive(St)),
        field("Multiple Birth Indicator", Primitive(Id)),
        field("Birth Order", Primitive(Nm)),
        field("Citizenship", Primitive(Is)),
        field("Veterans Military Status", Composite(&CE)),
        field("Nationality", Composite(&CE)),
        field("Patient Death Date and Time", Primitive(Ts)),
        field("Patient Death Indicator", Primitive(Id)),
    ],
};

pub static PD1: SegmentSchema = SegmentSchema {
    name: "PD1",
    fields: &[
        repeated("Living Dependency", Primitive(Is)),
        field("Living Arrangement", Primitive(Is)),
        repeated("Patient Primary Facility", Primitive(Cm)),
        repeated("Patient Primary Care Provider Name & ID No.", Primitive(Cm)),
        field("Student Indicator", Primitive(Is)),
        field("Handicap", Primitive(Is)),
        field("Living Will", Primitive(Is)),
        field("Organ Donor", Primitive(Is)),
        field("Separate Bill", Primitive(Id)),
        repeated("Duplicate Patient", Composite(&CX)),
        field("Publicity Indicator", Composite(&CE)),
        field("Protection Indicator", Primitive(Id)),
    ],
};

pub static NK1: SegmentSchema = SegmentSchema {
    name: "NK1",
    fields: &[
        field("Set ID", Primitive(Si)),
        repeated("Name", Composite(&XPN)),
        field("Relationship", Composite(&CE)),
        repeated("Address", Composite(&XAD)),
        repeated("Phone Number", Composite(&XTN)),
        repeated("Business Phone Number", Composite(&XTN)),
        field("Contact Role", Composite(&CE)),
        field("Start Date", Primitive(Dt)),
        field("End Date", Primitive(Dt)),
        field("Next of Kin/Associated Parties Job Title", Primitive(St)),
        field("Next of Kin/Associated Parties Job Code/Class", Primitive(Cm)),
        field("Next of Kin/Associated Parties Employee Number", Composite(&CX)),
        repeated("Organization Name", Primitive(Cm)),
    ],
};

pub static PV1: SegmentSchema = SegmentSchema {
    name: "PV1",
    fields: &[
        field("Set ID", Primitive(Si)),
        field("Patient Class", Primitive(Is)),
        field("Assigned Patient Location", Composite(&PL)),
        field("Admission Type", Primitive(Is)),
        field("Preadmit Number", Composite(&CX)),
        field("Prior Patient Location", Composite(&PL)),
        repeated("Attending Doctor", Composite(&XCN)),
        repeated("Referring Doctor", Composite(&XCN)),
        repeated("Consulting Doctor", Composite(&XCN)),
        field("Hospital Service", Primitive(Is)),
        field("Temporary Location", Composite(&PL)),
        field("Preadmit Test Indicator", Primitive(Is)),
        field("Re-admission Indicator", Primitive(Is)),
        field("Admit Source", Primitive(Is)),
        repeated("Ambulatory Status", Primitive(Is)),
        field("VIP Indicator", Primitive(Is)),
        repeated("Admitting Doctor", Composite(&XCN)),
        field("Patient Type", Primitive(Is)),
        field("Visit Number", Composite(&CX)),
        repeated("Financial Class", Composite(&FC)),
        field("Charge Price Indicator", Primitive(Is)),
        field("Courtesy Code", Primitive(Is)),
        field("Credit Rating", Primitive(Is)),
        repeated("Contract Code", Primitive(Is)),
        repeated("Contract Effective Date", Primitive(Dt)),
        repeated("Contract Amount", Primitive(Nm)),
        repeated("Contract Period", Primitive(Nm)),
        field("Interest Code", Primitive(Is)),
        field("Transfer to Bad Debt Code", Primitive(Is)),
        field("Transfer to Bad Debt Date", Primitive(Dt)),
        field("Bad Debt Agency Code", Primitive(Is)),
        field("Bad Debt Transfer Amount", Primitive(Nm)),
        field("Bad Debt Recovery Amount", Primitive(Nm)),
        field("Delete Account Indicator", Primitive(Is)),
        field("Delete Account Date", Primitive(Dt)),
        field("Discharge Disposition", Primitive(Is)),
        field("Discharged to Location", Primitive(Cm)),
        field("Diet Type", Primitive(Is)),
        field("Servicing Facility", Primitive(Is)),
        field("Bed Status", Primitive(Is)),
        field("Account Status", Primitive(Is)),
        field("Pending Location", Composite(&PL)),
        field("Prior Temporary Location", Composite(&PL)),
        field("Admit Date/Time", Primitive(Ts)),
        field("Discharge Date/Time", Primitive(Ts)),
        field("Current Patient Balance", Primitive(Nm)),
        field("Total Charges", Primitive(Nm)),
        field("Total Adjustments", Primitive(Nm)),
        field("Total Payments", Primitive(Nm)),
        field("Alternate Visit ID", Composite(&CX)),
        field("Visit Indicator", Primitive(Is)),
        repeated("Other Healthcare Provider", Composite(&XCN)),
    ],
};

pub static AL1: SegmentSchema = SegmentSchema {
    name: "AL1",
    fields: &[
        field("Set ID", Primitive(Si)),
        field("Allergy Type", Primitive(Is)),
        field("Allergy Code/Mnemonic/Description", Composite(&CE)),
        field("Allergy Severity", Primitive(Is)),
        field("Allergy Reaction", Primitive(St)),
        field("Identification Date", Primitive(Dt)),
    ],
};

pub static DG1: SegmentSchema = SegmentSchema {
    name: "DG1",
    fields: &[
        field("Set ID", Primitive(Si)),
        field("Diagnosis Coding Method", Primitive(Id)),
        field("Diagnosis Code", Composite(&CE)),
        field("Diagnosis Description", Primitive(St)),
        field("Diagnosis Date/Time", Primitive(Ts)),
        field("Diagnosis Type", Primitive(Is)),
        field("Major Diagnostic Category", Composite(&CE)),
        field("Diagnostic Related Group", Composite(&CE)),
        field("DRG Approval Indicator", Primitive(Id)),
        field("DRG Grouper Review Code", Primitive(Is)),
        field("Outlier Type", Composite(&CE)),
        field("Outlier Days", Primitive(Nm)),
        field("Outlier Cost", Primitive(Cm)),
        field("Grouper Version and Type", Primitive(St)),
        field("Diagnosis Priority", Primitive(Nm)),
        repeated("Diagnosing Clinician", Composite(&XCN)),
        field("Diagnosis Classification", Primitive(Is)),
        field("Confidential Indicator", Primitive(Id)),
        field("Attestation Date/Time", Primitive(Ts)),
    ],
};

pub static ORC: SegmentSchema = SegmentSchema {
    name: "ORC",
    fields: &[
        field("Order Control", Primitive(Id)),
        field("Placer Order Number", Composite(&EI)),
        field("Filler Order Number", Composite(&EI)),
        field("Placer Group Number", Composite(&EI)),
        field("Order Status", Primitive(Id)),
        field("Response Flag", Primitive(Id)),
        repeated("Quantity/Timing", Primitive(Cm)),
        field("Parent", Primitive(Cm)),
        field("Date/Time of Transaction", Primitive(Ts)),
        repeated("Entered By", Composite(&XCN)),
        repeated("Verified By", Composite(&XCN)),
        repeated("Ordering Provider", Composite(&XCN)),
        field("Enterer's Location", Composite(&PL)),
        repeated("Call Back Phone Number", Composite(&XTN)),
        field("Order Effective Date/Time", Primitive(Ts)),
        field("Order Control Code Reason", Composite(&CE)),
        field("Entering Organization", Composite(&CE)),
        field("Entering Device", Composite(&CE)),
        repeated("Action By", Composite(&XCN)),
    ],
};

pub static OBR: SegmentSchema = SegmentSchema {
    name: "OBR",
    fields: &[
        field("Set ID", Primitive(Si)),
        field("Placer Order Number", Composite(&EI)),
        field("Filler Order Number", Composite(&EI)),
        field("Universal Service ID", Composite(&CE)),
        field("Priority", Primitive(Id)),
        field("Requested Date/Time", Primitive(Ts)),
        field("Observation Date/Time", Primitive(Ts)),
        field("Observation End Date/Time", Primitive(Ts)),
        field("Collection Volume", Composite(&CQ)),
        repeated("Collector Identifier", Composite(&XCN)),
        field("Specimen Action Code", Primitive(Id)),
        field("Danger Code", Composite(&CE)),
        field("Relevant Clinical Info", Primitive(St)),
        field("Specimen Received Date/Time", Primitive(Ts)),
        field("Specimen Source", Primitive(Cm)),
        repeated("Ordering Provider", Composite(&XCN)),
        repeated("Order Callback Phone Number", Composite(&XTN)),
        field("Placer Field 1", Primitive(St)),
        field("Placer Field 2", Primitive(St)),
        field("Filler Field 1", Primitive(St)),
        field("Filler Field 2", Primitive(St)),
        field("Results Rpt/Status Chng - Date/Time", Primitive(Ts)),
        field("Charge to Practice", Primitive(Cm)),
        field("Diagnostic Serv Sect ID", Primitive(Id)),
        field("Result Status", Primitive(Id)),
        field("Parent Result", Primitive(Cm)),
        repeated("Quantity/Timing", Primitive(Cm)),
        repeated("Result Copies To", Composite(&XCN)),
        field("Parent", Primitive(Cm)),
        field("Transportation Mode", Primitive(Id)),
        repeated("Reason for Study", Composite(&CE)),
        field("Principal Result Interpreter", Primitive(Cm)),
        repeated("Assistant Result Interpreter", Primitive(Cm)),
        repeated("Technician", Primitive(Cm)),
        repeated("Transcriptionist", Primitive(Cm)),
        field("Scheduled Date/Time", Primitive(Ts)),
        field("Number of Sample Containers", Primitive(Nm)),
        repeated("Transport Logistics of Collected Sample", Composite(&CE)),
        repeated("Collector's Comment", Composite(&CE)),
        field("Transport Arrangement Responsibility", Composite(&CE)),
        field("Transport Arranged", Primitive(Id)),
        field("Escort Required", Primitive(Id)),
        repeated("Planned Patient Transport Comment", Composite(&CE)),
    ],
};

pub static OBX: SegmentSchema = SegmentSchema {
    name: "OBX",
    fields: &[
        field("Set ID", Primitive(Si)),
        field("Value Type", Primitive(Id)),
        field("Observation Identifier", Composite(&CE)),
        field("Observation Sub-ID", Primitive(St)),
        repeated("Observation Value", Primitive(Any)),
        field("Units", Composite(&CE)),
        field("References Range", Primitive(St)),
        repeated("Abnormal Flags", Primitive(Id)),
        field("Probability", Primitive(Nm)),
        repeated("Nature of Abnormal Test", Primitive(Id)),
        field("Observation Result Status", Primitive(Id)),
        field("Date Last Obs Normal Values", Primitive(Ts)),
        field("User Defined Access Checks", Primitive(St)),
        field("Date/Time of the Observation", Primitive(Ts)),
        field("Producer's ID", Composite(&CE)),
        field("Responsible Observer", Composite(&XCN)),
        repeated("Observation Method", Composite(&CE)),
    ],
};

pub static NTE: SegmentSchema = SegmentSchema {
    name: "NTE",
    fields: &[
        field("Set ID", Primitive(Si)),
        field("Source of Comment", Primitive(Id)),
        repeated("Comment", Primitive(Ft)),
    ],
};

static SEGMENTS: Lazy<HashMap<&'static str, &'static SegmentSchema>> = Lazy::new(|| {
    let mut segments: HashMap<&'static str, &'static SegmentSchema> = HashMap::new();
    for schema in [
        &MSH, &MSA, &ERR, &EVN, &PID, &PD1, &NK1, &PV1, &AL1, &DG1, &ORC, &OBR, &OBX, &NTE,
    ] {
        segments.insert(schema.name, schema);
    }
    segments
});

/// The registry backed by the built-in HL7 v2.3 catalog.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultRegistry;

impl SegmentRegistry for DefaultRegistry {
    fn lookup(&self, name: &str) -> Option<&'static SegmentSchema> {
        SEGMENTS.get(name).copied()
    }
}
