//! AWS Lambda handler for the calculators
//!
//! Accepts a JSON body tagged with `calculator` behind API Gateway and
//! returns the calculation result as JSON. Validation failures come back as
//! 400 responses naming the offending field.

use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_lambda_events::encodings::Body;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use retirement_calculators::{
    classify_inherited_ira, compare_lump_sum, evaluate_srs, present_value,
    fees::{self, FeeSchedule, ProjectionInput},
    BeneficiaryFacts, PensionInput, ValidationError,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, to_value, Value};

/// Input for one calculation
#[derive(Debug, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculatorRequest {
    /// Cost projection for a single fee schedule
    Project(ProjectionInput),

    /// Ranking of several schedules at one or more horizons
    Rank {
        principal: f64,
        horizons: Vec<u32>,
        schedules: Vec<FeeSchedule>,
    },

    /// FERS Special Retirement Supplement
    Srs {
        retirement_age: u32,
        years_of_service: u32,
        estimated_ss_benefit_at_62: f64,
    },

    /// Inherited IRA beneficiary classification
    InheritedIra(BeneficiaryFacts),

    /// Pension present value, optionally against a lump-sum offer
    Pension {
        pension: PensionInput,
        #[serde(default)]
        lump_sum: Option<f64>,
    },
}

#[derive(Debug, Serialize)]
pub struct CalculatorResponse {
    pub result: Value,
    pub execution_time_ms: u64,
}

/// Why a calculation produced no result
#[derive(Debug, thiserror::Error)]
pub enum CalculatorError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

fn calculate(request: CalculatorRequest) -> Result<Value, CalculatorError> {
    let value = match request {
        CalculatorRequest::Project(input) => to_value(fees::project(&input)?)?,
        CalculatorRequest::Rank { principal, horizons, schedules } => {
            to_value(fees::rank_across_horizons(principal, &horizons, &schedules)?)?
        }
        CalculatorRequest::Srs { retirement_age, years_of_service, estimated_ss_benefit_at_62 } => {
            to_value(evaluate_srs(retirement_age, years_of_service, estimated_ss_benefit_at_62)?)?
        }
        CalculatorRequest::InheritedIra(facts) => to_value(classify_inherited_ira(&facts)?)?,
        CalculatorRequest::Pension { pension, lump_sum } => match lump_sum {
            Some(lump_sum) => to_value(compare_lump_sum(&pension, lump_sum)?)?,
            None => to_value(present_value(&pension)?)?,
        },
    };
    Ok(value)
}

fn json_response(status: i64, body: &Value) -> ApiGatewayProxyResponse {
    ApiGatewayProxyResponse {
        status_code: status,
        body: Some(Body::Text(body.to_string())),
        is_base64_encoded: false,
        ..Default::default()
    }
}

fn error_response(status: i64, message: &str) -> ApiGatewayProxyResponse {
    json_response(status, &json!({ "error": message }))
}

fn failure_response(err: &CalculatorError) -> ApiGatewayProxyResponse {
    match err {
        CalculatorError::Invalid(e) => json_response(
            400,
            &json!({
                "error": e.to_string(),
                "field": e.field(),
                "detail": e,
            }),
        ),
        CalculatorError::Encode(e) => {
            warn!("result serialization failed: {}", e);
            error_response(500, &err.to_string())
        }
    }
}

/// Lambda handler function
async fn handler(event: LambdaEvent<ApiGatewayProxyRequest>) -> Result<ApiGatewayProxyResponse, Error> {
    let start = std::time::Instant::now();

    let body = event.payload.body.unwrap_or_else(|| "{}".to_string());
    let request: CalculatorRequest = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(e) => {
            warn!("rejected request body: {}", e);
            return Ok(error_response(400, &format!("Invalid JSON: {}", e)));
        }
    };

    info!("running {:?}", request);

    let result = match calculate(request) {
        Ok(result) => result,
        Err(e) => return Ok(failure_response(&e)),
    };

    let response = CalculatorResponse {
        result,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };
    match to_value(response) {
        Ok(body) => Ok(json_response(200, &body)),
        Err(e) => Ok(failure_response(&CalculatorError::Encode(e))),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
