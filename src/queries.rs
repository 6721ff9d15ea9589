//! Static GraphQL documents understood by the submission portal.
//!
//! Documents are compiled in and never assembled from caller input; every
//! parameter travels through the request's `variables` object.

/// A named GraphQL document and the variables it declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    pub name: &'static str,
    pub document: &'static str,
    pub variables: &'static [&'static str],
}

pub const LIST_SUBMISSIONS: Query = Query {
    name: "listSubmissions",
    document: r#"
query ListSubmissions(
    $status: [String],
    $first: Int,
    $offset: Int,
    $orderBy: String,
    $sortDirection: String
) {
    listSubmissions(
        status: $status,
        first: $first,
        offset: $offset,
        orderBy: $orderBy,
        sortDirection: $sortDirection
    ) {
        total
        submissions {
            _id
            name
            submitterName
            dataCommons
            studyAbbreviation
            studyID
            dbGaPID
            modelVersion
            status
            conciergeName
            createdAt
            updatedAt
            intention
        }
    }
}
"#,
    variables: &["status", "first", "offset", "orderBy", "sortDirection"],
};

pub const GET_SUBMISSION: Query = Query {
    name: "getSubmission",
    document: r#"
query GetSubmission($id: ID!) {
    getSubmission(_id: $id) {
        _id
        name
        dataCommons
        status
        updatedAt
    }
}
"#,
    variables: &["id"],
};

pub const MY_STUDIES: Query = Query {
    name: "getMyUser",
    document: r#"
query GetMyUser {
    getMyUser {
        studies {
            _id
            studyAbbreviation
            studyName
            dbGaPID
        }
    }
}
"#,
    variables: &[],
};

pub const ORG_STUDIES: Query = Query {
    name: "listApprovedStudiesOfMyOrganization",
    document: r#"
query ListApprovedStudiesOfMyOrganization {
    listApprovedStudiesOfMyOrganization {
        _id
        originalOrg
        dbGaPID
        studyAbbreviation
        studyName
    }
}
"#,
    variables: &[],
};

pub const CREATE_SUBMISSION: Query = Query {
    name: "createSubmission",
    document: r#"
mutation CreateNewSubmission(
    $studyID: String!,
    $dbGaPID: String!,
    $dataCommons: String!,
    $name: String!,
    $intention: String!,
    $dataType: String!
) {
    createSubmission(
        studyID: $studyID,
        dbGaPID: $dbGaPID,
        dataCommons: $dataCommons,
        name: $name,
        intention: $intention,
        dataType: $dataType
    ) {
        _id
        studyID
        dbGaPID
        dataCommons
        name
        intention
        dataType
        status
    }
}
"#,
    variables: &["studyID", "dbGaPID", "dataCommons", "name", "intention", "dataType"],
};

pub const CREATE_BATCH: Query = Query {
    name: "createBatch",
    document: r#"
mutation CreateBatch($submissionID: ID!, $type: String!, $files: [FileInput]) {
    createBatch(submissionID: $submissionID, type: $type, files: $files) {
        _id
        files {
            fileName
            signedURL
        }
    }
}
"#,
    variables: &["submissionID", "type", "files"],
};

pub const UPDATE_BATCH: Query = Query {
    name: "updateBatch",
    document: r#"
mutation UpdateBatch($batchID: ID!, $files: [UploadResult]) {
    updateBatch(batchID: $batchID, files: $files) {
        _id
        status
        fileCount
    }
}
"#,
    variables: &["batchID", "files"],
};

pub const AGGREGATED_QC_RESULTS: Query = Query {
    name: "aggregatedSubmissionQCResults",
    document: r#"
query AggregatedSubmissionQCResults(
    $submissionID: ID!,
    $severity: String,
    $first: Int,
    $offset: Int,
    $orderBy: String,
    $sortDirection: String
) {
    aggregatedSubmissionQCResults(
        submissionID: $submissionID,
        severity: $severity,
        first: $first,
        offset: $offset,
        orderBy: $orderBy,
        sortDirection: $sortDirection
    ) {
        total
        results {
            code
            severity
            title
            count
        }
    }
}
"#,
    variables: &["submissionID", "severity", "first", "offset", "orderBy", "sortDirection"],
};

pub const SUBMISSION_QC_RESULTS: Query = Query {
    name: "submissionQCResults",
    document: r#"
query SubmissionQCResults(
    $id: ID!,
    $severities: String,
    $issueCode: String,
    $first: Int,
    $offset: Int,
    $orderBy: String,
    $sortDirection: String
) {
    submissionQCResults(
        _id: $id,
        severities: $severities,
        issueCode: $issueCode,
        first: $first,
        offset: $offset,
        orderBy: $orderBy,
        sortDirection: $sortDirection
    ) {
        total
        results {
            submissionID
            type
            validationType
            batchID
            displayID
            submittedID
            severity
            uploadedDate
            validatedDate
            errors {
                title
                description
            }
            warnings {
                title
                description
            }
        }
    }
}
"#,
    variables: &[
        "id",
        "severities",
        "issueCode",
        "first",
        "offset",
        "orderBy",
        "sortDirection",
    ],
};

pub const SUBMISSION_STATS: Query = Query {
    name: "submissionStats",
    document: r#"
query SubmissionStats($id: ID!) {
    submissionStats(_id: $id) {
        stats {
            nodeName
            total
            new
            error
            warning
            passed
        }
    }
}
"#,
    variables: &["id"],
};

pub const SUBMISSION_NODES: Query = Query {
    name: "getSubmissionNodes",
    document: r#"
query GetSubmissionNodes(
    $_id: String!,
    $nodeType: String!,
    $status: String,
    $first: Int,
    $offset: Int,
    $orderBy: String,
    $sortDirection: String
) {
    getSubmissionNodes(
        submissionID: $_id,
        nodeType: $nodeType,
        status: $status,
        first: $first,
        offset: $offset,
        orderBy: $orderBy,
        sortDirection: $sortDirection
    ) {
        total
        IDPropName
        properties
        nodes {
            nodeID
            nodeType
            status
            props
        }
    }
}
"#,
    variables: &[
        "_id",
        "nodeType",
        "status",
        "first",
        "offset",
        "orderBy",
        "sortDirection",
    ],
};

pub const RETRIEVED_RELEASED_DATA: Query = Query {
    name: "retrieveReleasedDataByID",
    document: r#"
query RetrieveReleasedDataByID(
    $submissionID: String!,
    $nodeType: String!,
    $nodeID: String!
) {
    retrieveReleasedDataByID(
        submissionID: $submissionID,
        nodeType: $nodeType,
        nodeID: $nodeID
    ) {
        submissionID
        status
        dataCommons
        dataCommonsDisplayName
        studyID
        nodeType
        nodeID
        props
    }
}
"#,
    variables: &["submissionID", "nodeType", "nodeID"],
};

pub const ALL: &[Query] = &[
    LIST_SUBMISSIONS,
    GET_SUBMISSION,
    MY_STUDIES,
    ORG_STUDIES,
    CREATE_SUBMISSION,
    CREATE_BATCH,
    UPDATE_BATCH,
    AGGREGATED_QC_RESULTS,
    SUBMISSION_QC_RESULTS,
    SUBMISSION_STATS,
    SUBMISSION_NODES,
    RETRIEVED_RELEASED_DATA,
];

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use std::collections::BTreeSet;

    #[test]
    fn test_declared_variables_match_document() {
        let declared = Regex::new(r"\$(\w+)\s*:").unwrap();
        for query in ALL {
            let in_document: BTreeSet<&str> = declared
                .captures_iter(query.document)
                .filter_map(|c| c.get(1).map(|m| m.as_str()))
                .collect();
            let listed: BTreeSet<&str> = query.variables.iter().copied().collect();
            assert_eq!(in_document, listed, "variables of {}", query.name);
        }
    }

    #[test]
    fn test_documents_name_their_root_field() {
        for query in ALL {
            assert!(
                query.document.contains(query.name),
                "{} missing root field",
                query.name
            );
        }
    }

    #[test]
    fn test_names_are_unique() {
        let names: BTreeSet<&str> = ALL.iter().map(|q| q.name).collect();
        assert_eq!(names.len(), ALL.len());
    }
}
